pub mod category_queries;
pub mod company_queries;
pub mod product_queries;
pub mod role_queries;
pub mod user_queries;

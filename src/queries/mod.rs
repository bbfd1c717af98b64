pub mod company_queries;
pub mod contact_queries;
pub mod followup_queries;
pub mod stats_queries;
pub mod task_queries;

pub mod company_ops;
pub mod contact_ops;
pub mod document_ops;
pub mod followup_ops;

pub mod apr;
pub mod link;
pub mod loan;

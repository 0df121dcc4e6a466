pub mod principal;

pub use principal::{PRINCIPAL_HEADER, Principal};

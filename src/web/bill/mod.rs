pub mod container;
pub mod data;
pub mod format;
pub mod ssr;

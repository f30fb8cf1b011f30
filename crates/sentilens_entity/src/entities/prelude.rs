pub use super::analysis::Entity as Analysis;

//! Rules Oracle の実装
//!
//! - `standard`: `chess` クレートを使った標準ルールの実装

pub mod standard;

pub use standard::StandardRules;

//! 份量换算
//!
//! 一个菜谱只有一个份量计数器，所有配料块都按它统一换算。
//! 计算是纯同步的，不修改原始文档。

pub mod calculator;
pub mod counter;
pub mod scale;

pub use calculator::{PortionCalculator, ScaledBlock};
pub use counter::ServingCounter;
pub use scale::{format_amount, parse_amount, scale_value, ScaledIngredient};

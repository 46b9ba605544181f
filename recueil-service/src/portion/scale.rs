use recueil_domain::IngredientEntry;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use utoipa::ToSchema;

use super::counter::ServingCounter;

fn numeric_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid amount pattern")
    })
}

/// 解析数量开头的十进制数
///
/// 只读取开头的数字部分：`"2.5 kleine"` 为 2.5，`"1/2"` 为 1，
/// `"nach Geschmack"` 没有数字。结果不大于 0 时同样视为没有数字。
pub fn parse_amount(raw: &str) -> Option<f64> {
    let matched = numeric_prefix().find(raw)?;
    let value: f64 = matched.as_str().trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// `amount / original * current`，份量未调整时原样返回
pub fn scale_value(amount: f64, original: u32, current: u32) -> f64 {
    if original == current || original == 0 {
        return amount;
    }
    amount / f64::from(original) * f64::from(current)
}

/// 按 f64 的精确十进制展开保留 `decimals` 位小数
///
/// 只看被舍去的第一位：不小于 5 则进位，恰好一半时远离零。
/// 例如 1.15 实际存储为 1.1499999…，结果为 "1.1"。
fn to_fixed(value: f64, decimals: usize) -> String {
    // f64 的十进制展开最多 1074 位小数，这个精度下格式化没有舍入
    let exact = format!("{:.1074}", value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(decimals))
        .map(|b| b - b'0')
        .collect();

    let round_up = frac_part.as_bytes().get(decimals).is_some_and(|&b| b >= b'5');
    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let int_len = digits.len() - decimals;
    let mut formatted = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        formatted.push('-');
    }
    formatted.extend(digits[..int_len].iter().map(|d| char::from(b'0' + d)));
    if decimals > 0 {
        formatted.push('.');
        formatted.extend(digits[int_len..].iter().map(|d| char::from(b'0' + d)));
    }
    formatted
}

/// 格式化换算后的数量
///
/// 整数不带小数；小于 1 保留两位；其余保留一位。
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else if value < 1.0 {
        to_fixed(value, 2)
    } else {
        to_fixed(value, 1)
    }
}

/// 换算后的配料
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScaledIngredient {
    /// 没有数字时为 None，此时不显示数量和单位
    pub amount: Option<String>,
    pub unit: Option<String>,
    pub name: String,
    pub display: String,
}

impl ScaledIngredient {
    pub fn scale(entry: &IngredientEntry, counter: &ServingCounter) -> Self {
        let amount = parse_amount(&entry.amount)
            .map(|value| scale_value(value, counter.original(), counter.current()))
            .map(format_amount);
        let unit = entry
            .unit
            .as_deref()
            .map(str::trim)
            .filter(|unit| !unit.is_empty())
            .map(str::to_string);

        let display = match (&amount, &unit) {
            (Some(amount), Some(unit)) => format!("{} {} {}", amount, unit, entry.name),
            (Some(amount), None) => format!("{} {}", amount, entry.name),
            (None, _) => entry.name.clone(),
        };

        Self {
            amount,
            unit,
            name: entry.name.clone(),
            display,
        }
    }
}

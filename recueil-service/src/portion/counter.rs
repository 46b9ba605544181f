use serde::Serialize;
use utoipa::ToSchema;

/// ServingCounter 记录原始份量与当前份量
///
/// 当前份量最少为 1，没有上限。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServingCounter {
    original: u32,
    current: u32,
}

impl ServingCounter {
    /// 原始份量为 0 时按 1 处理
    pub fn new(original: u32) -> Self {
        let original = original.max(1);
        Self {
            original,
            current: original,
        }
    }

    /// 以指定的当前份量创建，同样不低于 1
    pub fn with_current(original: u32, current: u32) -> Self {
        let mut counter = Self::new(original);
        counter.current = current.max(1);
        counter
    }

    pub fn original(&self) -> u32 {
        self.original
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn increment(&mut self) {
        self.current = self.current.saturating_add(1);
    }

    /// 到 1 以后不再减少
    pub fn decrement(&mut self) {
        if self.current > 1 {
            self.current -= 1;
        }
    }

    pub fn is_adjusted(&self) -> bool {
        self.current != self.original
    }

    /// 份量单位的单复数
    pub fn servings_label(&self) -> &'static str {
        if self.current == 1 {
            "Portion"
        } else {
            "Portionen"
        }
    }

    /// 调整提示，例如 "Angepasst von 4 auf 2 Portionen"
    pub fn adjustment_note(&self) -> Option<String> {
        self.is_adjusted().then(|| {
            format!(
                "Angepasst von {} auf {} {}",
                self.original,
                self.current,
                self.servings_label()
            )
        })
    }
}

//! 标识符类型
//!
//! 定义网络元素标识符与输出链路。

use std::fmt;

/// 网络元素标识符（在 `Network` 元素表中的下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 输出链路：下一个元素，或终点（sink）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputLink {
    Element(ElementId),
    #[default]
    Sink,
}

impl OutputLink {
    pub fn element(self) -> Option<ElementId> {
        match self {
            OutputLink::Element(id) => Some(id),
            OutputLink::Sink => None,
        }
    }

    pub fn is_sink(self) -> bool {
        matches!(self, OutputLink::Sink)
    }
}

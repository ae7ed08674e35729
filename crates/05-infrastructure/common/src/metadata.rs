//! 元数据定义
//!
//! 提供组件和接口的类型信息以及限定符

use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息，支持 `dyn Trait`
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: short_type_name(full_name).to_string(),
            id: TypeId::of::<T>(),
            module_path: full_name.to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }

    /// 获取完整类型路径
    pub fn full_name(&self) -> &str {
        &self.module_path
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module_path)
    }
}

fn short_type_name(full_name: &str) -> &str {
    let base = full_name.split('<').next().unwrap_or(full_name);
    base.rsplit("::").next().unwrap_or(base)
}

/// 限定符标签
///
/// 空白标签等价于未设置，表示接受任意实现。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Qualifier(Option<String>);

impl Qualifier {
    /// 未设置的限定符
    pub fn any() -> Self {
        Self(None)
    }

    /// 创建限定符，空白字符串视为未设置
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            Self(None)
        } else {
            Self(Some(trimmed.to_string()))
        }
    }

    /// 是否未设置
    pub fn is_any(&self) -> bool {
        self.0.is_none()
    }

    /// 获取标签值
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl From<&str> for Qualifier {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Qualifier {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or(""))
    }
}

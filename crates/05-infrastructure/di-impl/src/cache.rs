//! 单例缓存

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use infrastructure_common::{BeanHandle, BeanInstance, TypeInfo};
use std::any::TypeId;
use std::sync::Arc;

/// 单例缓存
///
/// 每个类型最多写入一次。初始化完成后可以被多个线程并发读取。
#[derive(Debug, Default)]
pub struct SingletonCache {
    beans: DashMap<TypeId, BeanHandle>,
}

impl SingletonCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取类型擦除的实例
    pub fn get(&self, type_id: TypeId) -> Option<BeanInstance> {
        self.beans
            .get(&type_id)
            .map(|entry| entry.value().instance().clone())
    }

    /// 按具体类型获取实例
    pub fn get_typed<T>(&self) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.get(TypeId::of::<T>())
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    /// 类型是否已缓存
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.beans.contains_key(&type_id)
    }

    /// 写入实例，类型已存在时不覆盖并返回 `false`
    pub fn insert_once(&self, type_info: &TypeInfo, instance: BeanInstance) -> bool {
        match self.beans.entry(type_info.id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(BeanHandle::new(type_info.clone(), instance));
                true
            }
        }
    }

    /// 移除实例
    pub fn evict(&self, type_id: TypeId) -> Option<BeanInstance> {
        self.beans
            .remove(&type_id)
            .map(|(_, handle)| handle.instance().clone())
    }

    /// 已缓存的类型
    pub fn cached_types(&self) -> Vec<TypeInfo> {
        self.beans
            .iter()
            .map(|entry| entry.value().type_info().clone())
            .collect()
    }

    /// 缓存的实例数量
    pub fn len(&self) -> usize {
        self.beans.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Clock;

    #[test]
    fn insert_once_keeps_first_instance() {
        let cache = SingletonCache::new();
        let info = TypeInfo::of::<Clock>();
        let first: BeanInstance = Arc::new(Clock);
        let second: BeanInstance = Arc::new(Clock);

        assert!(cache.insert_once(&info, first.clone()));
        assert!(!cache.insert_once(&info, second));
        let cached = cache.get(info.id).unwrap();
        assert!(Arc::ptr_eq(&cached, &first));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn typed_lookup_and_eviction() {
        let cache = SingletonCache::new();
        let info = TypeInfo::of::<Clock>();
        cache.insert_once(&info, Arc::new(Clock));

        assert!(cache.get_typed::<Clock>().is_some());
        assert!(cache.get_typed::<String>().is_none());
        assert!(cache.evict(info.id).is_some());
        assert!(!cache.contains(info.id));
        assert!(cache.is_empty());
    }
}

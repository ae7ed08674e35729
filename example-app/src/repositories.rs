//! 评论存储
//!
//! 两种实现都提供 [`CommentRepository`]，通过限定符 `file` / `db` 区分。

use crate::model::Comment;
use component_macros::component;
use parking_lot::Mutex;
use tracing::info;

/// 评论存储
pub trait CommentRepository: Send + Sync {
    /// 保存评论
    fn store_comment(&self, comment: &Comment);

    /// 已保存的评论
    fn comments(&self) -> Vec<Comment>;
}

/// 文件存储
#[derive(Debug, Default)]
pub struct FileCommentRepository {
    stored: Mutex<Vec<Comment>>,
}

#[component(qualifier = "file", provides(dyn CommentRepository))]
impl FileCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommentRepository for FileCommentRepository {
    fn store_comment(&self, comment: &Comment) {
        info!("保存评论到文件: {}", comment.text);
        self.stored.lock().push(comment.clone());
    }

    fn comments(&self) -> Vec<Comment> {
        self.stored.lock().clone()
    }
}

/// 数据库存储
#[derive(Debug, Default)]
pub struct DbCommentRepository {
    stored: Mutex<Vec<Comment>>,
}

#[component(qualifier = "db", provides(dyn CommentRepository))]
impl DbCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommentRepository for DbCommentRepository {
    fn store_comment(&self, comment: &Comment) {
        info!("保存评论到数据库: {}", comment.text);
        self.stored.lock().push(comment.clone());
    }

    fn comments(&self) -> Vec<Comment> {
        self.stored.lock().clone()
    }
}

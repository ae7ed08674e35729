//! 评论服务

use crate::model::Comment;
use crate::proxies::{CommentNotificationProxy, EmailCommentNotificationProxy};
use crate::repositories::{CommentRepository, DbCommentRepository};
use component_macros::component;
use std::sync::Arc;
use tracing::info;

/// 评论服务
pub struct CommentService {
    repository: Arc<dyn CommentRepository>,
    notification_proxy: Arc<dyn CommentNotificationProxy>,
}

#[component]
impl CommentService {
    /// 不经过容器时使用数据库存储和邮件通知
    pub fn new() -> Self {
        Self {
            repository: Arc::new(DbCommentRepository::new()),
            notification_proxy: Arc::new(EmailCommentNotificationProxy::new()),
        }
    }

    #[autowired]
    pub fn with_dependencies(
        #[qualifier("file")] repository: Arc<dyn CommentRepository>,
        notification_proxy: Arc<dyn CommentNotificationProxy>,
    ) -> Self {
        Self {
            repository,
            notification_proxy,
        }
    }

    #[post_construct]
    fn recommend_email_notification(&self) {
        info!("建议通过邮件发送评论通知");
    }

    /// 保存并通知，返回通知内容
    pub fn publish_comment(&self, comment: &Comment) -> String {
        self.repository.store_comment(comment);
        self.notification_proxy.send_comment(comment)
    }
}

impl Default for CommentService {
    fn default() -> Self {
        Self::new()
    }
}

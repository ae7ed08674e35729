//! 评论通知

use crate::model::Comment;
use component_macros::component;
use tracing::info;

/// 评论通知代理
pub trait CommentNotificationProxy: Send + Sync {
    /// 发送评论通知，返回通知内容
    fn send_comment(&self, comment: &Comment) -> String;
}

/// 邮件通知
#[derive(Debug, Default)]
pub struct EmailCommentNotificationProxy;

#[component(provides(dyn CommentNotificationProxy))]
impl EmailCommentNotificationProxy {
    pub fn new() -> Self {
        Self
    }
}

impl CommentNotificationProxy for EmailCommentNotificationProxy {
    fn send_comment(&self, comment: &Comment) -> String {
        let notification = format!("发送评论通知: {}", comment.text);
        info!("{}", notification);
        notification
    }
}

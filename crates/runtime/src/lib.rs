//! Taskdeck Runtime - 视图控制器
//!
//! 职责：
//! - 持有会话内的任务集合副本
//! - 发起存储调用并与结果对账
//! - 将失败转换为用户可见的提示

pub mod controller;
pub mod op;

pub use controller::{
    EditSession, EditStage, RowState, TaskListController, ADD_FAILED, BLANK_TITLE,
    DELETE_FAILED, LOAD_FAILED, RENAME_FAILED, UPDATE_FAILED,
};
pub use op::{Completion, PendingOp};

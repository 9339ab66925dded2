//! Data models for the Škola Online REST payloads.

pub mod behavior;
pub mod homework;
pub mod mark;
pub mod message;
pub mod schedule;
pub mod user;

pub use behavior::BehaviorList;
pub use homework::HomeworkList;
pub use mark::{MarkDetail, MarkList};
pub use message::{merge_messages, Direction, Message, MessagePage};
pub use schedule::TimeTable;
pub use user::{select_semester, CodeLists, CurrentUser, Semester, UserProfile};

//! 页面状态
//!
//! 列表页的全部界面状态集中在 [`PageState`] 中，由 [`PageState::apply`]
//! 按事件做纯状态转换；网络请求等副作用由 [`super::page::StarsPage`] 负责。

use std::str::FromStr;

use crate::app::stars::model::{Star, StarId, StarPatch};
use crate::core::response::Paginated;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Major,
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(FormField::Name),
            "email" => Ok(FormField::Email),
            "major" => Ok(FormField::Major),
            other => Err(format!("unknown field: {other}")),
        }
    }
}

/// 编辑弹窗的表单缓冲
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarForm {
    pub name: String,
    pub email: String,
    pub major: String,
}

impl StarForm {
    pub fn from_star(star: &Star) -> Self {
        Self {
            name: star.name.clone(),
            email: star.email.clone(),
            major: star.major.clone(),
        }
    }

    /// 返回替换了一个字段的新缓冲
    pub fn with_field(&self, field: FormField, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            FormField::Name => Self { name: value, ..self.clone() },
            FormField::Email => Self { email: value, ..self.clone() },
            FormField::Major => Self { major: value, ..self.clone() },
        }
    }

    /// 保存时提交完整缓冲
    pub fn to_patch(&self) -> StarPatch {
        StarPatch {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            major: Some(self.major.clone()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub star_id: StarId,
    pub form: StarForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum PageEvent {
    FetchCompleted(Paginated<Star>),
    FetchFailed(String),
    EditOpened(Star),
    FieldChanged(FormField, String),
    EditCancelled,
    SaveSucceeded(String),
    SaveFailed(String),
    DeleteSucceeded(StarId, String),
    DeleteFailed(String),
    NoticeDismissed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub phase: Phase,
    pub stars: Vec<Star>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
    pub editing: Option<EditSession>,
    pub notice: Option<Notice>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
            stars: Vec::new(),
            total: 0,
            page: 1,
            total_pages: 0,
            editing: None,
            notice: None,
        }
    }
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn has_error(&self) -> bool {
        matches!(&self.notice, Some(notice) if notice.kind == NoticeKind::Error)
    }

    pub fn find(&self, id: StarId) -> Option<&Star> {
        self.stars.iter().find(|star| star.id == id)
    }

    pub fn apply(self, event: PageEvent) -> Self {
        match event {
            PageEvent::FetchCompleted(page) => Self {
                phase: Phase::Ready,
                stars: page.data,
                total: page.total,
                page: page.page,
                total_pages: page.total_pages,
                // 成功获取后旧的错误提示失效，成功提示保留
                notice: self.notice.filter(|notice| notice.kind != NoticeKind::Error),
                ..self
            },
            PageEvent::FetchFailed(message) => Self {
                phase: Phase::Ready,
                notice: Some(Notice::error(format!("Error fetching data: {message}"))),
                ..self
            },
            PageEvent::EditOpened(star) => Self {
                editing: Some(EditSession {
                    star_id: star.id,
                    form: StarForm::from_star(&star),
                }),
                ..self
            },
            PageEvent::FieldChanged(field, value) => {
                let editing = self.editing.as_ref().map(|session| EditSession {
                    star_id: session.star_id,
                    form: session.form.with_field(field, value),
                });
                Self { editing, ..self }
            }
            PageEvent::EditCancelled => Self {
                editing: None,
                ..self
            },
            PageEvent::SaveSucceeded(message) => Self {
                editing: None,
                notice: Some(Notice::info(message)),
                ..self
            },
            PageEvent::SaveFailed(message) => Self {
                notice: Some(Notice::error(format!("Failed to update the star: {message}"))),
                ..self
            },
            PageEvent::DeleteSucceeded(id, message) => {
                let stars = self.stars.into_iter().filter(|star| star.id != id).collect();
                Self {
                    stars,
                    total: self.total.saturating_sub(1),
                    notice: Some(Notice::info(message)),
                    ..self
                }
            }
            PageEvent::DeleteFailed(message) => Self {
                notice: Some(Notice::error(format!("Failed to delete the star: {message}"))),
                ..self
            },
            PageEvent::NoticeDismissed => Self {
                notice: None,
                ..self
            },
        }
    }
}

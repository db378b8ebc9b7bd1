//! 明星列表页
//!
//! 把 [`StarsClient`] 的请求结果转换成 [`PageEvent`]，再交给
//! [`PageState::apply`]。请求失败只会体现在状态的提示信息中。

use tracing::{debug, warn};

use super::api::StarsClient;
use super::state::{FormField, PageEvent, PageState};
use crate::app::stars::model::{ListQuery, StarId};

pub struct StarsPage {
    client: StarsClient,
    query: ListQuery,
    state: PageState,
}

impl StarsPage {
    /// 不带查询参数，与首次进入页面时的请求一致
    pub fn new(client: StarsClient) -> Self {
        Self::with_query(client, ListQuery::default())
    }

    pub fn with_query(client: StarsClient, query: ListQuery) -> Self {
        Self {
            client,
            query,
            state: PageState::new(),
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    fn dispatch(&mut self, event: PageEvent) {
        debug!("page event: {:?}", event);
        self.state = std::mem::take(&mut self.state).apply(event);
    }

    pub async fn load(&mut self) {
        match self.client.list(&self.query).await {
            Ok(page) => self.dispatch(PageEvent::FetchCompleted(page)),
            Err(e) => {
                warn!("Error fetching data: {}", e);
                self.dispatch(PageEvent::FetchFailed(e.to_string()));
            }
        }
    }

    /// 打开编辑弹窗；记录不在当前页时单独获取
    pub async fn open_edit(&mut self, id: StarId) {
        let star = match self.state.find(id) {
            Some(star) => star.clone(),
            None => match self.client.get(id).await {
                Ok(star) => star,
                Err(e) => {
                    self.dispatch(PageEvent::FetchFailed(e.to_string()));
                    return;
                }
            },
        };
        self.dispatch(PageEvent::EditOpened(star));
    }

    pub fn change_field(&mut self, field: FormField, value: impl Into<String>) {
        self.dispatch(PageEvent::FieldChanged(field, value.into()));
    }

    pub fn cancel_edit(&mut self) {
        self.dispatch(PageEvent::EditCancelled);
    }

    /// 提交完整表单；成功后关闭弹窗并重新获取列表
    pub async fn save(&mut self) {
        let Some(session) = self.state.editing.clone() else {
            return;
        };

        match self.client.update(session.star_id, &session.form.to_patch()).await {
            Ok(response) => {
                self.dispatch(PageEvent::SaveSucceeded(response.message));
                self.load().await;
            }
            Err(e) => {
                warn!("Failed to update the star: {}", e);
                self.dispatch(PageEvent::SaveFailed(e.to_string()));
            }
        }
    }

    /// 删除成功后只在本地移除，不重新获取
    pub async fn delete(&mut self, id: StarId) {
        match self.client.delete(id).await {
            Ok(response) => self.dispatch(PageEvent::DeleteSucceeded(id, response.message)),
            Err(e) => {
                warn!("Failed to delete the star: {}", e);
                self.dispatch(PageEvent::DeleteFailed(e.to_string()));
            }
        }
    }
}

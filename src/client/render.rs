//! 终端渲染

use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

use super::state::{NoticeKind, PageState, Phase, StarForm};
use crate::app::stars::model::Star;

fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn stars_table(stars: &[Star]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["ID", "Name", "Email", "Major"]);
    for star in stars {
        table.add_row(vec![
            star.id.to_string(),
            star.name.clone(),
            star.email.clone(),
            star.major.clone(),
        ]);
    }
    table
}

pub fn star_details(star: &Star) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["_id".to_string(), star.id.to_string()]);
    table.add_row(vec!["name".to_string(), star.name.clone()]);
    table.add_row(vec!["email".to_string(), star.email.clone()]);
    table.add_row(vec!["major".to_string(), star.major.clone()]);
    for (key, value) in &star.extra {
        table.add_row(vec![key.clone(), value.to_string()]);
    }
    table.add_row(vec!["created_at".to_string(), star.created_at.to_rfc3339()]);
    table.add_row(vec!["updated_at".to_string(), star.updated_at.to_rfc3339()]);
    table
}

pub fn edit_form(form: &StarForm) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Update", ""]);
    table.add_row(vec!["Name", form.name.as_str()]);
    table.add_row(vec!["Email", form.email.as_str()]);
    table.add_row(vec!["Major", form.major.as_str()]);
    table
}

/// 渲染整个页面：列表、分页信息、编辑表单和提示
pub fn page(state: &PageState) -> String {
    let mut out = String::new();

    if state.phase == Phase::Loading {
        out.push_str("Loading...\n");
    } else if state.stars.is_empty() {
        out.push_str("No stars found.\n");
    } else {
        out.push_str(&stars_table(&state.stars).to_string());
        out.push('\n');
        out.push_str(&format!(
            "Page {} of {} ({} total)\n",
            state.page,
            state.total_pages.max(1),
            state.total
        ));
    }

    if let Some(session) = &state.editing {
        out.push_str(&edit_form(&session.form).to_string());
        out.push('\n');
    }

    if let Some(notice) = &state.notice {
        let prefix = match notice.kind {
            NoticeKind::Info => "ok",
            NoticeKind::Error => "error",
        };
        out.push_str(&format!("[{}] {}\n", prefix, notice.message));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::stars::model::{NewStar, StarId};
    use crate::client::state::PageEvent;
    use crate::core::response::Paginated;

    #[test]
    fn test_page_rendering() {
        let star = Star::from_new(
            StarId::new(),
            NewStar::new("Meryl Streep", "m@s.com", "Drama"),
            chrono::Utc::now(),
        );

        assert!(page(&PageState::new()).contains("Loading"));

        let state = PageState::new()
            .apply(PageEvent::FetchCompleted(Paginated::new(vec![star.clone()], 1, 1, 6)))
            .apply(PageEvent::EditOpened(star.clone()))
            .apply(PageEvent::DeleteFailed("boom".into()));
        let rendered = page(&state);

        assert!(rendered.contains("Meryl Streep"));
        assert!(rendered.contains("Page 1 of 1 (1 total)"));
        assert!(rendered.contains("Update"));
        assert!(rendered.contains("[error] Failed to delete the star: boom"));
    }
}

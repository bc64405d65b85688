use crate::api::timesheet::{
    DeletedResponse, EditedTimesheetCheck, NewTimesheetCheck, SaveTimesheet,
    UpdateTimesheetByManager, UpdateTimesheetByUser,
};
use crate::model::timesheet::{Timesheet, TimesheetStatus};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Timesheet API",
        version = "1.0.0",
        description = r#"
## Leave / time-off requests ("time sheets")

### 🔹 Lifecycle
- An employee submits a time sheet; it starts as **PENDING**
- The owner may edit dates and note while it is **PENDING**
- A manager sets **APPROVED** or **REJECTED**; approval debits the owner's days off

### ✅ Rules
- Periods of non-rejected time sheets may not overlap (touching days count)
- Requested business days plus every other PENDING time sheet must fit in the remaining days off
- Both dates must lie in the current year, and the to date may not precede the from date

### 📦 Response Format
- JSON bodies; failures answer `{"message": "..."}` with 400 or 404
- The check endpoints answer a bare `true` / `false`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::timesheet::create_timesheet,
        crate::api::timesheet::list_user_timesheets,
        crate::api::timesheet::get_timesheet,
        crate::api::timesheet::update_timesheet_by_user,
        crate::api::timesheet::update_timesheet_by_manager,
        crate::api::timesheet::delete_timesheet,
        crate::api::timesheet::check_new_overlap,
        crate::api::timesheet::check_edited_overlap,
        crate::api::timesheet::check_new_exceed,
        crate::api::timesheet::check_edited_exceed
    ),
    components(
        schemas(
            Timesheet,
            TimesheetStatus,
            SaveTimesheet,
            UpdateTimesheetByUser,
            UpdateTimesheetByManager,
            NewTimesheetCheck,
            EditedTimesheetCheck,
            DeletedResponse
        )
    ),
    tags(
        (name = "Timesheet", description = "Leave request lifecycle and pre-submit checks"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_timesheet_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/timesheets/user/{user_id}",
            "/api/timesheets/{id}",
            "/api/timesheets/{id}/user",
            "/api/timesheets/{id}/manager",
            "/api/timesheets/new/overlap",
            "/api/timesheets/edited/overlap",
            "/api/timesheets/new/exceed",
            "/api/timesheets/edited/exceed",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {}", expected);
        }
    }
}

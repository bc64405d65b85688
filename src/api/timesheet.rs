use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::timesheet::{Timesheet, TimesheetStatus};
use crate::service::timesheet::TimesheetService;

#[derive(Deserialize, ToSchema)]
pub struct SaveTimesheet {
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-03-06", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[schema(example = "Family trip")]
    #[serde(default)]
    pub note: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateTimesheetByUser {
    #[schema(example = "2026-03-03", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-03-06", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[serde(default)]
    pub note: String,
    #[schema(example = "jdoe")]
    pub modified_by: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateTimesheetByManager {
    #[schema(example = "APPROVED")]
    pub status: TimesheetStatus,
    #[schema(example = "manager")]
    pub modified_by: String,
}

/// Period to test against a user's timesheets
#[derive(Deserialize, ToSchema)]
pub struct NewTimesheetCheck {
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-03-06", format = "date", value_type = String)]
    pub to_date: NaiveDate,
}

/// Period of an existing timesheet being edited
#[derive(Deserialize, ToSchema)]
pub struct EditedTimesheetCheck {
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = 1)]
    pub timesheet_id: u64,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-03-06", format = "date", value_type = String)]
    pub to_date: NaiveDate,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    #[schema(example = "Deleted")]
    pub message: String,
}

/// Route table for the timesheet resources
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/timesheets")
            // /timesheets/user/{user_id}
            .service(
                web::resource("/user/{user_id}")
                    .route(web::post().to(create_timesheet))
                    .route(web::get().to(list_user_timesheets)),
            )
            .service(web::resource("/new/overlap").route(web::post().to(check_new_overlap)))
            .service(web::resource("/edited/overlap").route(web::post().to(check_edited_overlap)))
            .service(web::resource("/new/exceed").route(web::post().to(check_new_exceed)))
            .service(web::resource("/edited/exceed").route(web::post().to(check_edited_exceed)))
            // /timesheets/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_timesheet))
                    .route(web::delete().to(delete_timesheet)),
            )
            .service(web::resource("/{id}/user").route(web::patch().to(update_timesheet_by_user)))
            .service(
                web::resource("/{id}/manager").route(web::patch().to(update_timesheet_by_manager)),
            ),
    );
}

/* =========================
Submit a time sheet
========================= */
#[utoipa::path(
    post,
    path = "/api/timesheets/user/{user_id}",
    params(
        ("user_id" = u64, Path, description = "Owner of the new time sheet")
    ),
    request_body(content = SaveTimesheet, content_type = "application/json"),
    responses(
        (status = 200, description = "Time sheet submitted as PENDING", body = Timesheet),
        (status = 400, description = "Overlap, insufficient balance or invalid dates", body = Object, example = json!({
            "message": "Time sheet period should not overlap with previous time sheets"
        })),
        (status = 404, description = "User not found")
    ),
    tag = "Timesheet"
)]
pub async fn create_timesheet(
    service: web::Data<TimesheetService>,
    path: web::Path<u64>,
    payload: web::Json<SaveTimesheet>,
) -> actix_web::Result<impl Responder> {
    let user_id = path.into_inner();
    let payload = payload.into_inner();

    let timesheet = service
        .create(user_id, payload.from_date, payload.to_date, payload.note)
        .await?;

    Ok(HttpResponse::Ok().json(timesheet))
}

#[utoipa::path(
    get,
    path = "/api/timesheets/user/{user_id}",
    params(
        ("user_id" = u64, Path, description = "Owner of the time sheets")
    ),
    responses(
        (status = 200, description = "Every time sheet of the user", body = Vec<Timesheet>)
    ),
    tag = "Timesheet"
)]
pub async fn list_user_timesheets(
    service: web::Data<TimesheetService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let timesheets = service.list_by_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(timesheets))
}

#[utoipa::path(
    get,
    path = "/api/timesheets/{id}",
    params(
        ("id" = u64, Path, description = "Time sheet id")
    ),
    responses(
        (status = 200, description = "Time sheet found", body = Timesheet),
        (status = 404, description = "Time sheet not found", body = Object, example = json!({
            "message": "Time sheet with id:1 doesn't exist"
        }))
    ),
    tag = "Timesheet"
)]
pub async fn get_timesheet(
    service: web::Data<TimesheetService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let timesheet = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(timesheet))
}

/* =========================
Owner edit (PENDING only)
========================= */
#[utoipa::path(
    patch,
    path = "/api/timesheets/{id}/user",
    params(
        ("id" = u64, Path, description = "Time sheet id")
    ),
    request_body(content = UpdateTimesheetByUser, content_type = "application/json"),
    responses(
        (status = 200, description = "Time sheet updated", body = Timesheet),
        (status = 400, description = "Not PENDING, overlap, insufficient balance or invalid dates"),
        (status = 404, description = "Time sheet not found")
    ),
    tag = "Timesheet"
)]
pub async fn update_timesheet_by_user(
    service: web::Data<TimesheetService>,
    path: web::Path<u64>,
    payload: web::Json<UpdateTimesheetByUser>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let timesheet = service
        .update_by_user(
            path.into_inner(),
            payload.from_date,
            payload.to_date,
            payload.note,
            payload.modified_by,
        )
        .await?;

    Ok(HttpResponse::Ok().json(timesheet))
}

/* =========================
Manager decision
========================= */
#[utoipa::path(
    patch,
    path = "/api/timesheets/{id}/manager",
    params(
        ("id" = u64, Path, description = "Time sheet id")
    ),
    request_body(content = UpdateTimesheetByManager, content_type = "application/json"),
    responses(
        (status = 200, description = "Status stored; APPROVED debits the owner's days off", body = Timesheet),
        (status = 400, description = "Transition refused (strict mode only)"),
        (status = 404, description = "Time sheet not found")
    ),
    tag = "Timesheet"
)]
pub async fn update_timesheet_by_manager(
    service: web::Data<TimesheetService>,
    path: web::Path<u64>,
    payload: web::Json<UpdateTimesheetByManager>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let timesheet = service
        .update_by_manager(path.into_inner(), payload.status, payload.modified_by)
        .await?;

    Ok(HttpResponse::Ok().json(timesheet))
}

#[utoipa::path(
    delete,
    path = "/api/timesheets/{id}",
    params(
        ("id" = u64, Path, description = "Time sheet id")
    ),
    responses(
        (status = 200, description = "Time sheet deleted", body = DeletedResponse),
        (status = 404, description = "Time sheet not found")
    ),
    tag = "Timesheet"
)]
pub async fn delete_timesheet(
    service: web::Data<TimesheetService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    service.delete(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(DeletedResponse {
        message: "Deleted".to_string(),
    }))
}

/* =========================
Pre-submit checks
========================= */
#[utoipa::path(
    post,
    path = "/api/timesheets/new/overlap",
    request_body = NewTimesheetCheck,
    responses(
        (status = 200, description = "true if the period overlaps a non-rejected time sheet", body = bool)
    ),
    tag = "Timesheet"
)]
pub async fn check_new_overlap(
    service: web::Data<TimesheetService>,
    payload: web::Json<NewTimesheetCheck>,
) -> actix_web::Result<impl Responder> {
    let overlaps = service
        .check_new_overlap(payload.user_id, payload.from_date, payload.to_date)
        .await?;
    Ok(HttpResponse::Ok().json(overlaps))
}

#[utoipa::path(
    post,
    path = "/api/timesheets/edited/overlap",
    request_body = EditedTimesheetCheck,
    responses(
        (status = 200, description = "true if the new period overlaps another non-rejected time sheet", body = bool),
        (status = 404, description = "Time sheet not found")
    ),
    tag = "Timesheet"
)]
pub async fn check_edited_overlap(
    service: web::Data<TimesheetService>,
    payload: web::Json<EditedTimesheetCheck>,
) -> actix_web::Result<impl Responder> {
    let overlaps = service
        .check_edited_overlap(
            payload.user_id,
            payload.timesheet_id,
            payload.from_date,
            payload.to_date,
        )
        .await?;
    Ok(HttpResponse::Ok().json(overlaps))
}

#[utoipa::path(
    post,
    path = "/api/timesheets/new/exceed",
    request_body = NewTimesheetCheck,
    responses(
        (status = 200, description = "true if the period plus pending time sheets exceeds the balance", body = bool),
        (status = 404, description = "User not found")
    ),
    tag = "Timesheet"
)]
pub async fn check_new_exceed(
    service: web::Data<TimesheetService>,
    payload: web::Json<NewTimesheetCheck>,
) -> actix_web::Result<impl Responder> {
    let exceeds = service
        .check_new_exceeds_balance(payload.user_id, payload.from_date, payload.to_date)
        .await?;
    Ok(HttpResponse::Ok().json(exceeds))
}

#[utoipa::path(
    post,
    path = "/api/timesheets/edited/exceed",
    request_body = EditedTimesheetCheck,
    responses(
        (status = 200, description = "true if the edited period plus other pending time sheets exceeds the balance", body = bool),
        (status = 404, description = "User not found")
    ),
    tag = "Timesheet"
)]
pub async fn check_edited_exceed(
    service: web::Data<TimesheetService>,
    payload: web::Json<EditedTimesheetCheck>,
) -> actix_web::Result<impl Responder> {
    let exceeds = service
        .check_edited_exceeds_balance(
            payload.user_id,
            payload.timesheet_id,
            payload.from_date,
            payload.to_date,
        )
        .await?;
    Ok(HttpResponse::Ok().json(exceeds))
}

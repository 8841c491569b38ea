use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Academic Records API",
        description = "Careers, subjects, correlatividades, legajos and enrollments"
    ),
    paths(
        routes::health::route::health_check,
        routes::auth::route::login,
        routes::auth::route::me,
        routes::users::route::create_user,
        routes::users::route::get_all_users,
        routes::users::route::get_user_by_id,
        routes::users::route::update_user,
        routes::users::route::delete_user,
        routes::careers::route::create_career,
        routes::careers::route::get_all_careers,
        routes::careers::route::get_career,
        routes::careers::route::update_career,
        routes::careers::route::delete_career,
        routes::careers::route::get_career_subjects,
        routes::subjects::route::create_subject,
        routes::subjects::route::get_all_subjects,
        routes::subjects::route::get_subject,
        routes::subjects::route::update_subject,
        routes::subjects::route::delete_subject,
        routes::subjects::route::get_requirements,
        routes::subjects::route::create_requirement,
        routes::subjects::route::delete_requirement,
        routes::students::route::create_student,
        routes::students::route::get_all_students,
        routes::students::route::get_student,
        routes::students::route::update_student,
        routes::students::route::delete_student,
        routes::students::route::get_academic_record,
        routes::students::route::get_student_subjects,
        routes::students::route::get_available_subjects,
        routes::students::route::get_eligibility,
        routes::student_subjects::route::create_student_subject,
        routes::student_subjects::route::update_status,
        routes::enrollments::route::enroll,
        routes::enrollments::route::get_enrollments,
        routes::enrollments::route::delete_enrollment,
        routes::stats::route::get_dashboard,
        routes::stats::route::get_activity,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Login and token introspection"),
        (name = "Users", description = "User accounts"),
        (name = "Careers", description = "Degree programs and their plan of study"),
        (name = "Subjects", description = "Subjects and their requirements"),
        (name = "Students", description = "Legajos, eligibility and progress"),
        (name = "Student subjects", description = "Per-subject status and grades"),
        (name = "Enrollments", description = "Cursada and exam enrollments"),
        (name = "Statistics", description = "Dashboard and activity feed"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

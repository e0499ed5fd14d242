/*!
Serving the course materials themselves, as HTML or PDF.
*/
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::{header, StatusCode},
    http::header::HeaderValue,
    response::Response,
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    access::{self, Denial, Scope},
    config::Glob,
    material::{self, Material, COURSE_CODE},
    pdf::{pdf_filename, PdfCfg, PdfError},
    user::{Person, Role, Session},
    ISO_DATE_FMT, LONG_DATE_FMT,
};
use super::*;

/// Query parameters a material page understands.
///
/// Both are taken as raw strings so that junk values degrade to "absent"
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct MaterialParams {
    pub class_id: Option<String>,
    pub download: Option<String>,
}

impl MaterialParams {
    fn wants_pdf(&self) -> bool {
        matches!(self.download.as_deref(), Some("pdf"))
    }
}

/// Who is looking at a material, and in what scope.
#[derive(Clone, Copy, Debug)]
pub struct Viewer<'a> {
    pub user: &'a Person,
    pub instructor: &'a Person,
    pub role: Role,
    pub scope: Scope,
}

/// What a material is being rendered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Medium {
    /// A browser; the page carries the download and print toolbar.
    Screen,
    /// The PDF converter; no toolbar, and the configured PDF font.
    Pdf,
}

/// Everything interpolated into a material template.
#[derive(Debug, Serialize)]
pub struct MaterialData<'a> {
    pub course_code: &'static str,
    pub title: &'a str,
    pub week: Option<u8>,
    pub user_name: &'a str,
    pub user_email: &'a str,
    pub instructor_name: &'a str,
    pub instructor_email: &'a str,
    pub is_instructor: bool,
    pub class_id: Option<i64>,
    /// Long-form date, e.g. "October 19, 2026".
    pub today: String,
    pub today_iso: String,
    pub year: i32,
    pub html_href: String,
    pub pdf_href: String,
    /// Rendering for the PDF converter rather than a browser.
    pub for_pdf: bool,
    pub font: &'a str,
}

impl<'a> MaterialData<'a> {
    pub fn new(
        m: &'a Material,
        viewer: &Viewer<'a>,
        today: &Date,
        medium: Medium,
        pdf: &'a PdfCfg,
    ) -> Result<MaterialData<'a>, String> {
        let Viewer { user, instructor, role, scope } = *viewer;

        let long = today.format(&LONG_DATE_FMT)
            .map_err(|e| format!("Failed to format date {:?}: {}", today, &e))?;
        let iso = today.format(&ISO_DATE_FMT)
            .map_err(|e| format!("Failed to format date {:?}: {}", today, &e))?;

        let html_href = match scope {
            Scope::General => format!("/materials/{}", m.slug),
            Scope::Class(n) => format!("/materials/{}?class_id={}", m.slug, n),
        };
        let pdf_href = match scope {
            Scope::General => format!("/materials/{}?download=pdf", m.slug),
            Scope::Class(n) => format!("/materials/{}?class_id={}&download=pdf", m.slug, n),
        };

        let data = MaterialData {
            course_code: COURSE_CODE,
            title: m.title,
            week: m.week(),
            user_name: &user.name,
            user_email: &user.email,
            instructor_name: &instructor.name,
            instructor_email: &instructor.email,
            is_instructor: role == Role::Instructor,
            class_id: scope.class_id(),
            today: long,
            today_iso: iso,
            year: today.year(),
            html_href,
            pdf_href,
            for_pdf: medium == Medium::Pdf,
            font: &pdf.font,
        };
        Ok(data)
    }
}

#[derive(Debug, Serialize)]
struct TroubleData<'a> {
    title: &'a str,
    html_href: &'a str,
    /// The converter couldn't be started at all, as opposed to having failed.
    missing: bool,
}

pub fn render_material(m: &Material, data: &MaterialData) -> Result<String, String> {
    render_template(m.template, data)
}

fn default_instructor(glob: &Glob) -> Person {
    Person {
        name: glob.cfg.default_instructor_name.clone(),
        email: glob.cfg.default_instructor_email.clone(),
    }
}

/// The user's own display fields: from the database if possible, otherwise
/// whatever the session has cached.
async fn load_user(glob: &Glob, session: &Session) -> Person {
    let cached = || session.cached_user().unwrap_or(Person {
        name: String::new(),
        email: String::new(),
    });

    match glob.records.user_details(session.user_id).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            log::warn!("No users row for user {}; using session values.", &session.user_id);
            cached()
        },
        Err(e) => {
            log::warn!(
                "Error loading details of user {}; using session values: {}",
                &session.user_id, &e
            );
            cached()
        },
    }
}

/**
The instructor to show on the material.

A class-scoped request shows that class's instructor; otherwise a student
sees the instructor of their enrollment and an instructor sees themself.
No matching row gives the configured default; a database error falls back
to the session's cached instructor first.
*/
async fn load_instructor(
    glob: &Glob,
    session: &Session,
    role: Role,
    scope: Scope,
    user: &Person,
) -> Person {
    let res = match (role, scope) {
        (_, Scope::Class(class_id)) => glob.records.class_instructor(class_id).await,
        (Role::Student, Scope::General) => {
            let pattern = access::like_pattern(&glob.cfg.course_filter);
            glob.records.enrolled_instructor(session.user_id, &pattern).await
        },
        (Role::Instructor, Scope::General) => {
            if user.name.is_empty() {
                return default_instructor(glob);
            }
            return user.clone();
        },
    };

    match res {
        Ok(Some(p)) => p,
        Ok(None) => {
            log::trace!("No instructor found for {:?}; using default.", &scope);
            default_instructor(glob)
        },
        Err(e) => {
            log::warn!("Error loading instructor for {:?}: {}", &scope, &e);
            session.cached_instructor()
                .unwrap_or_else(|| default_instructor(glob))
        },
    }
}

fn respond_403(dashboard: &str) -> Response {
    let data = serde_json::json!({ "dashboard": dashboard });
    serve_template(StatusCode::FORBIDDEN, "forbidden", &data, vec![])
}

fn respond_pdf(bytes: Vec<u8>, filename: &str) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    let disposition = match HeaderValue::from_str(&disposition) {
        Ok(v) => v,
        Err(e) => {
            log::error!("Bad Content-Disposition {:?}: {}", &disposition, &e);
            return html_500();
        },
    };

    (StatusCode::OK, bytes).add_headers(vec![
        (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
        (header::CONTENT_DISPOSITION, disposition),
        (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
    ])
}

/// The converter's own error text only goes to the log; this page is
/// shown to students.
fn respond_pdf_trouble(m: &Material, html_href: &str, err: &PdfError) -> Response {
    let data = TroubleData {
        title: m.title,
        html_href,
        missing: matches!(err, PdfError::Unavailable(_)),
    };

    serve_template(StatusCode::OK, "pdf_unavailable", &data, vec![])
}

pub async fn serve(
    Path(slug): Path<String>,
    Query(params): Query<MaterialParams>,
    Extension(session): Extension<Session>,
    Extension(glob): Extension<Arc<Glob>>,
) -> Response {
    log::trace!(
        "material::serve( {:?}, {:?}, [ user {} ] ) called.",
        &slug, &params, &session.user_id
    );

    let m = match material::by_slug(&slug) {
        Some(m) => m,
        None => { return respond_404(); },
    };

    let role = match session.role() {
        Some(role) => role,
        None => { return respond_redirect(&glob.cfg.login_path); },
    };

    let scope = Scope::from_param(params.class_id.as_deref());

    match access::has_access(
        glob.records.as_ref(),
        session.user_id,
        role,
        scope,
        &glob.cfg.course_filter,
    ).await {
        Ok(true) => { /* Approved; carry on. */ },
        Ok(false) => {
            log::info!(
                "User {} ({}) denied {:?} for {:?}.",
                &session.user_id, &role, &slug, &scope
            );
            let cfg = &glob.cfg;
            return match access::denial(
                role, scope, &cfg.student_dashboard, &cfg.instructor_dashboard
            ) {
                Denial::Redirect(path) => respond_redirect(&path),
                Denial::Forbidden(dashboard) => respond_403(&dashboard),
            };
        },
        Err(e) => {
            log::error!(
                "Access check for user {} on {:?} failed: {}",
                &session.user_id, &slug, &e
            );
            return respond_db_error();
        },
    }

    let user = load_user(&glob, &session).await;
    let instructor = load_instructor(&glob, &session, role, scope, &user).await;
    let today = crate::now();
    let medium = if params.wants_pdf() { Medium::Pdf } else { Medium::Screen };
    let viewer = Viewer { user: &user, instructor: &instructor, role, scope };

    let data = match MaterialData::new(m, &viewer, &today, medium, &glob.cfg.pdf) {
        Ok(data) => data,
        Err(e) => {
            log::error!("{}", &e);
            return html_500();
        },
    };

    if medium == Medium::Screen {
        return serve_template(StatusCode::OK, m.template, &data, vec![]);
    }

    let html = match render_material(m, &data) {
        Ok(html) => html,
        Err(e) => {
            log::error!("{}", &e);
            return html_500();
        },
    };

    match glob.converter.convert(&html).await {
        Ok(bytes) => respond_pdf(bytes, &pdf_filename(m.topic, &today)),
        Err(e) => {
            log::warn!("PDF export of {:?} failed: {}", &slug, &e);
            respond_pdf_trouble(m, &data.html_href, &e)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use time::Month;
    use tower::ServiceExt;

    use crate::config::Cfg;
    use crate::pdf::{PdfConverter, Wkhtmltopdf};
    use crate::store::{DbError, Records};
    use crate::tests::ensure_logging;

    /// In-memory stand-in for the portal database.
    #[derive(Default)]
    struct FakeRecords {
        sessions: HashMap<String, Session>,
        /// (user, role, class) rows granting access.
        grants: Vec<(i64, Role, i64)>,
        users: HashMap<i64, Person>,
        class_instructors: HashMap<i64, Person>,
        enrolled_instructors: HashMap<i64, Person>,
        /// Fail every query after the session lookup.
        broken: bool,
        /// Fail only the display-field lookups.
        details_broken: bool,
    }

    fn dberr() -> DbError {
        DbError::from("Unable to connect: connection refused".to_owned())
    }

    #[async_trait]
    impl Records for FakeRecords {
        async fn session(&self, key: &str) -> Result<Option<Session>, DbError> {
            Ok(self.sessions.get(key).cloned())
        }

        async fn count_access(
            &self,
            user_id: i64,
            role: Role,
            scope: Scope,
            _pattern: &str,
        ) -> Result<i64, DbError> {
            if self.broken {
                return Err(dberr());
            }
            let n = self.grants.iter()
                .filter(|(u, r, c)| *u == user_id && *r == role && match scope {
                    Scope::General => true,
                    Scope::Class(class_id) => *c == class_id,
                })
                .count();
            Ok(n as i64)
        }

        async fn user_details(&self, user_id: i64) -> Result<Option<Person>, DbError> {
            if self.broken || self.details_broken {
                return Err(dberr());
            }
            Ok(self.users.get(&user_id).cloned())
        }

        async fn class_instructor(&self, class_id: i64) -> Result<Option<Person>, DbError> {
            if self.broken || self.details_broken {
                return Err(dberr());
            }
            Ok(self.class_instructors.get(&class_id).cloned())
        }

        async fn enrolled_instructor(
            &self,
            student_id: i64,
            _pattern: &str,
        ) -> Result<Option<Person>, DbError> {
            if self.broken || self.details_broken {
                return Err(dberr());
            }
            Ok(self.enrolled_instructors.get(&student_id).cloned())
        }
    }

    struct FakePdf;

    /// A converter that runs but chokes, the way `wkhtmltopdf` does on
    /// a broken install.
    struct FailingPdf;

    #[async_trait]
    impl PdfConverter for FailingPdf {
        async fn convert(&self, _html: &str) -> Result<Vec<u8>, PdfError> {
            Err(PdfError::Failed(
                "/usr/local/bin/wkhtmltopdf exited with exit status: 1: QXcbConnection: Could not connect to display".to_owned()
            ))
        }
    }

    #[async_trait]
    impl PdfConverter for FakePdf {
        async fn convert(&self, html: &str) -> Result<Vec<u8>, PdfError> {
            assert!(html.contains("<html"));
            Ok(b"%PDF-1.4\n% fake\n%%EOF\n".to_vec())
        }
    }

    fn person(name: &str, email: &str) -> Person {
        Person { name: name.to_owned(), email: email.to_owned() }
    }

    fn session(user_id: i64, role: &str) -> Session {
        Session {
            user_id,
            user_role: role.to_owned(),
            ..Default::default()
        }
    }

    /**
    Student 3 (Grace) is enrolled in class 10, taught by Ada (1).
    Instructor 1 (Ada) teaches class 10.
    Student 5 has a session but no enrollment.
    Class 20 has an enrolled student 6 but no instructor row.
    */
    fn fixture() -> FakeRecords {
        let mut r = FakeRecords::default();
        r.sessions.insert("grace".to_owned(), session(3, "student"));
        r.sessions.insert("ada".to_owned(), session(1, "instructor"));
        r.sessions.insert("nobody".to_owned(), session(5, "student"));
        r.sessions.insert("orphan".to_owned(), session(6, "student"));
        r.sessions.insert("admin".to_owned(), session(9, "admin"));

        r.grants.push((3, Role::Student, 10));
        r.grants.push((1, Role::Instructor, 10));
        r.grants.push((6, Role::Student, 20));

        r.users.insert(1, person("Ada Lovelace", "ada@example.com"));
        r.users.insert(3, person("Grace Hopper", "grace@example.com"));
        r.users.insert(6, person("Alan Turing", "alan@example.com"));

        r.class_instructors.insert(10, person("Ada Lovelace", "ada@example.com"));
        r.enrolled_instructors.insert(3, person("Ada Lovelace", "ada@example.com"));
        r
    }

    fn app_with(records: FakeRecords, converter: Arc<dyn PdfConverter>) -> Router {
        ensure_logging();
        init("templates").unwrap();

        let glob = Glob {
            cfg: Cfg::default(),
            records: Arc::new(records),
            converter,
        };
        router(Arc::new(glob))
    }

    fn app(records: FakeRecords) -> Router {
        app_with(records, Arc::new(FakePdf))
    }

    fn get(uri: &str, key: Option<&str>) -> Request<Body> {
        let mut b = Request::builder().uri(uri);
        if let Some(key) = key {
            b = b.header(header::COOKIE, format!("mo100_session={}", key));
        }
        b.body(Body::empty()).unwrap()
    }

    async fn body_string(r: Response) -> String {
        let bytes = hyper::body::to_bytes(r.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(r: &Response) -> &str {
        r.headers().get(header::LOCATION).unwrap().to_str().unwrap()
    }

    #[tokio::test]
    async fn unauthenticated_goes_to_login() {
        for key in [None, Some("no-such-session"), Some("admin")] {
            let r = app(fixture()).oneshot(get("/materials/syllabus", key)).await.unwrap();
            assert!(r.status().is_redirection(), "key {:?}", key);
            assert_eq!(location(&r), "/login");
        }
    }

    #[tokio::test]
    async fn unauthorized_without_class_goes_to_dashboard() {
        let r = app(fixture()).oneshot(get("/materials/week-1", Some("nobody"))).await.unwrap();
        assert!(r.status().is_redirection());
        assert_eq!(location(&r), "/student/dashboard");

        let mut records = fixture();
        records.grants.clear();
        let r = app(records).oneshot(get("/materials/week-1", Some("ada"))).await.unwrap();
        assert!(r.status().is_redirection());
        assert_eq!(location(&r), "/instructor/dashboard");
    }

    #[tokio::test]
    async fn unauthorized_with_class_is_forbidden() {
        let r = app(fixture())
            .oneshot(get("/materials/week-2?class_id=11", Some("grace")))
            .await.unwrap();
        assert_eq!(r.status(), StatusCode::FORBIDDEN);
        let body = body_string(r).await;
        assert!(!body.contains("Week 2: Inserting and Formatting Text"));
        assert!(body.contains("/student/dashboard"));
    }

    #[tokio::test]
    async fn junk_class_id_means_general() {
        let r = app(fixture())
            .oneshot(get("/materials/syllabus?class_id=abc", Some("grace")))
            .await.unwrap();
        assert_eq!(r.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn student_sees_material() {
        let r = app(fixture()).oneshot(get("/materials/syllabus", Some("grace"))).await.unwrap();
        assert_eq!(r.status(), StatusCode::OK);
        assert_eq!(
            r.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap(),
            "text/html; charset=utf-8"
        );
        let body = body_string(r).await;
        assert!(body.contains("Course Syllabus"));
        assert!(body.contains("Grace Hopper"));
        assert!(body.contains("grace@example.com"));
        assert!(body.contains("Ada Lovelace"));
        assert!(body.contains("/materials/syllabus?download=pdf"));
    }

    #[tokio::test]
    async fn class_instructor_shown() {
        let r = app(fixture())
            .oneshot(get("/materials/week-3?class_id=10", Some("ada")))
            .await.unwrap();
        assert_eq!(r.status(), StatusCode::OK);
        let body = body_string(r).await;
        assert!(body.contains("Ada Lovelace"));
        assert!(body.contains("/materials/week-3?class_id=10&download=pdf"));
    }

    #[tokio::test]
    async fn missing_instructor_uses_default() {
        let r = app(fixture())
            .oneshot(get("/materials/week-1?class_id=20", Some("orphan")))
            .await.unwrap();
        assert_eq!(r.status(), StatusCode::OK);
        let body = body_string(r).await;
        assert!(body.contains("Alan Turing"));
        assert!(body.contains(&Cfg::default().default_instructor_name));
    }

    #[tokio::test]
    async fn details_fall_back_to_session() {
        let mut records = fixture();
        records.details_broken = true;
        let s = records.sessions.get_mut("grace").unwrap();
        s.first_name = Some("Cached".to_owned());
        s.last_name = Some("Grace".to_owned());
        s.instructor_name = Some("Cached Instructor".to_owned());

        let r = app(records).oneshot(get("/materials/week-4", Some("grace"))).await.unwrap();
        assert_eq!(r.status(), StatusCode::OK);
        let body = body_string(r).await;
        assert!(body.contains("Cached Grace"));
        assert!(body.contains("Cached Instructor"));
    }

    #[tokio::test]
    async fn names_are_escaped() {
        let mut records = fixture();
        records.users.insert(3, person("<script>alert(1)</script>", "x@example.com"));
        let r = app(records).oneshot(get("/materials/syllabus", Some("grace"))).await.unwrap();
        let body = body_string(r).await;
        assert!(!body.contains("<script>alert(1)</script>"));
        assert!(body.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn database_failure_is_terminal_page() {
        let mut records = fixture();
        records.broken = true;
        let r = app(records).oneshot(get("/materials/syllabus", Some("grace"))).await.unwrap();
        assert_eq!(r.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(r).await;
        assert!(body.contains("Course Materials Unavailable"));
    }

    #[tokio::test]
    async fn unknown_material() {
        let r = app(fixture()).oneshot(get("/materials/week-12", Some("grace"))).await.unwrap();
        assert_eq!(r.status(), StatusCode::NOT_FOUND);

        // The session check still comes first.
        let r = app(fixture()).oneshot(get("/materials/week-12", None)).await.unwrap();
        assert!(r.status().is_redirection());
    }

    #[tokio::test]
    async fn pdf_download() {
        let r = app(fixture())
            .oneshot(get("/materials/syllabus?download=pdf", Some("grace")))
            .await.unwrap();
        assert_eq!(r.status(), StatusCode::OK);
        assert_eq!(
            r.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap(),
            "application/pdf"
        );
        let disposition = r.headers().get(header::CONTENT_DISPOSITION).unwrap()
            .to_str().unwrap().to_owned();
        assert!(disposition.starts_with("attachment; filename=\"MO-100_Syllabus_"));
        assert!(disposition.ends_with(".pdf\""));

        let bytes = hyper::body::to_bytes(r.into_body()).await.unwrap();
        assert!(!bytes.is_empty());
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn pdf_converter_missing() {
        let missing = Wkhtmltopdf::new(PdfCfg {
            converter: std::path::PathBuf::from("/nonexistent/mo100/wkhtmltopdf"),
            ..Default::default()
        });
        let r = app_with(fixture(), Arc::new(missing))
            .oneshot(get("/materials/week-2?class_id=10&download=pdf", Some("grace")))
            .await.unwrap();

        assert_eq!(r.status(), StatusCode::OK);
        assert!(r.headers().get(header::CONTENT_TYPE).unwrap()
            .to_str().unwrap().starts_with("text/html"));
        let body = body_string(r).await;
        assert!(body.contains("PDF Export Unavailable"));
        assert!(body.contains("/materials/week-2?class_id=10"));
        assert!(body.contains("window.print()"));
        assert!(body.contains("is not installed"));
        assert!(!body.contains("/nonexistent/mo100/wkhtmltopdf"));
    }

    #[tokio::test]
    async fn pdf_converter_fails() {
        let r = app_with(fixture(), Arc::new(FailingPdf))
            .oneshot(get("/materials/week-3?download=pdf", Some("grace")))
            .await.unwrap();

        assert_eq!(r.status(), StatusCode::OK);
        assert!(r.headers().get(header::CONTENT_TYPE).unwrap()
            .to_str().unwrap().starts_with("text/html"));
        let body = body_string(r).await;
        assert!(body.contains("PDF Export Unavailable"));
        assert!(body.contains("did not produce a document"));
        assert!(!body.contains("is not installed"));
        assert!(body.contains("/materials/week-3"));
        assert!(body.contains("window.print()"));

        // Converter internals stay in the log.
        assert!(!body.contains("QXcbConnection"));
        assert!(!body.contains("/usr/local/bin/wkhtmltopdf"));
    }

    #[tokio::test]
    async fn instructor_forbidden_links_instructor_dashboard() {
        let r = app(fixture())
            .oneshot(get("/materials/week-1?class_id=11", Some("ada")))
            .await.unwrap();
        assert_eq!(r.status(), StatusCode::FORBIDDEN);
        let body = body_string(r).await;
        assert!(body.contains("/instructor/dashboard"));
        assert!(!body.contains("/student/dashboard"));
    }

    #[tokio::test]
    async fn pdf_denied_before_conversion() {
        let r = app(fixture())
            .oneshot(get("/materials/syllabus?download=pdf&class_id=99", Some("grace")))
            .await.unwrap();
        assert_eq!(r.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn rendering_is_deterministic() {
        ensure_logging();
        init("templates").unwrap();

        let user = person("Grace Hopper", "grace@example.com");
        let inst = person("Ada Lovelace", "ada@example.com");
        let day = Date::from_calendar_date(2026, Month::October, 19).unwrap();
        let pdf = PdfCfg::default();
        let viewer = Viewer {
            user: &user,
            instructor: &inst,
            role: Role::Student,
            scope: Scope::Class(10),
        };

        for m in material::CATALOG.iter() {
            let render = || {
                let data = MaterialData::new(m, &viewer, &day, Medium::Screen, &pdf).unwrap();
                render_material(m, &data).unwrap()
            };
            let first = render();
            assert_eq!(first, render());
            assert!(first.contains("October 19, 2026"), "{} lacks date", m.slug);
            assert!(first.contains(m.title), "{} lacks title", m.slug);
        }

        // Only the date fields differ from one day to the next.
        let m = material::by_slug("week-1").unwrap();
        let next = day.next_day().unwrap();
        let general = Viewer { scope: Scope::General, ..viewer };
        let render_on = |d: &Date| {
            let data = MaterialData::new(m, &general, d, Medium::Screen, &pdf).unwrap();
            render_material(m, &data).unwrap()
        };
        assert_eq!(
            render_on(&day)
                .replace("October 19, 2026", "DATE")
                .replace("2026-10-19", "ISO"),
            render_on(&next)
                .replace("October 20, 2026", "DATE")
                .replace("2026-10-20", "ISO"),
        );
    }

    #[test]
    fn print_rendering() {
        ensure_logging();
        init("templates").unwrap();

        let user = person("Grace Hopper", "grace@example.com");
        let inst = person("Ada Lovelace", "ada@example.com");
        let day = Date::from_calendar_date(2026, Month::October, 19).unwrap();
        let m = material::by_slug("syllabus").unwrap();
        let pdf = PdfCfg {
            font: "Liberation Serif".to_owned(),
            ..Default::default()
        };
        let viewer = Viewer {
            user: &user,
            instructor: &inst,
            role: Role::Student,
            scope: Scope::General,
        };

        let data = MaterialData::new(m, &viewer, &day, Medium::Pdf, &pdf).unwrap();
        let html = render_material(m, &data).unwrap();
        assert!(html.contains("Liberation Serif"));
        assert!(!html.contains("?download=pdf"));
    }
}

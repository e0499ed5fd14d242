/*!
Database interaction module.

The Postgres database this reads from belongs to the rest of the portal;
nothing here creates or mutates rows. The tables consulted look like this:

```sql
CREATE TABLE users (
    id         BIGSERIAL PRIMARY KEY,
    email      TEXT,
    first_name TEXT,
    last_name  TEXT,
    role       TEXT     /* one of { 'student', 'instructor' } */
);

CREATE TABLE courses (
    id    BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL
);

CREATE TABLE class_batches (
    id            BIGSERIAL PRIMARY KEY,
    instructor_id BIGINT REFERENCES users(id),
    course_id     BIGINT REFERENCES courses(id)
);

CREATE TABLE enrollments (
    student_id BIGINT REFERENCES users(id),
    class_id   BIGINT REFERENCES class_batches(id),
    status     TEXT     /* 'active', 'completed', 'dropped', ... */
);

CREATE TABLE sessions (
    key              TEXT PRIMARY KEY,
    user_id          BIGINT,
    user_role        TEXT,
    user_email       TEXT,
    first_name       TEXT,
    last_name        TEXT,
    instructor_name  TEXT,
    instructor_email TEXT
);
```

Integer parameters are cast to `BIGINT` in every query, so the queries work
whether the portal's id columns are `INTEGER` or `BIGINT`.
*/
use std::fmt::Write;

use async_trait::async_trait;
use tokio_postgres::{Client, NoTls};

use crate::access::Scope;
use crate::user::{Person, Role, Session};

mod access;
mod sessions;
mod users;

#[derive(Debug, PartialEq)]
pub struct DbError(String);

impl DbError {
    /// Prepend some contextual `annotation` for the error.
    fn annotate(self, annotation: &str) -> Self {
        let s = format!("{}: {}", annotation, &self.0);
        Self(s)
    }

    pub fn display(&self) -> &str { &self.0 }
}

impl std::fmt::Display for DbError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", &self.0)
    }
}

impl From<tokio_postgres::error::Error> for DbError {
    fn from(e: tokio_postgres::error::Error) -> DbError {
        let mut s = format!("Data DB: {}", &e);
        if let Some(dbe) = e.as_db_error() {
            // Writing to a String can't fail.
            let _ = write!(&mut s, "; {}", dbe);
        }
        DbError(s)
    }
}

impl From<String> for DbError {
    fn from(s: String) -> DbError { DbError(s) }
}

/**
Everything a material page needs to read from the outside world.

`Store` is the real implementation; handler tests supply their own.
*/
#[async_trait]
pub trait Records: Send + Sync {
    /// Look up the session stored under cookie value `key`.
    async fn session(&self, key: &str) -> Result<Option<Session>, DbError>;

    /// Number of rows granting `user_id` (acting as `role`) access to
    /// material in courses whose title matches the LIKE `pattern`.
    async fn count_access(
        &self,
        user_id: i64,
        role: Role,
        scope: Scope,
        pattern: &str,
    ) -> Result<i64, DbError>;

    async fn user_details(&self, user_id: i64) -> Result<Option<Person>, DbError>;

    /// The instructor assigned to class batch `class_id`.
    async fn class_instructor(&self, class_id: i64) -> Result<Option<Person>, DbError>;

    /// The instructor of the student's most recent active (or completed)
    /// enrollment in a course matching `pattern`.
    async fn enrolled_instructor(
        &self,
        student_id: i64,
        pattern: &str,
    ) -> Result<Option<Person>, DbError>;
}

pub struct Store {
    connection_string: String,
}

impl Store {
    pub fn new(connection_string: String) -> Self {
        log::trace!("Store::new( [ connection string ] ) called.");

        Self { connection_string }
    }

    async fn connect(&self) -> Result<Client, DbError> {
        log::trace!("Store::connect() called.");

        match tokio_postgres::connect(&self.connection_string, NoTls).await {
            Ok((client, connection)) => {
                log::trace!("    ...connection successful.");
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        log::error!("Data DB connection error: {}", &e);
                    } else {
                        log::trace!("tokio connection runtime drops.");
                    }
                });
                Ok(client)
            },
            Err(e) => {
                let dberr = DbError::from(e);
                log::trace!("    ...connection failed: {:?}", &dberr);
                Err(dberr.annotate("Unable to connect"))
            }
        }
    }

    /// Make sure the database is reachable at all.
    pub async fn ping(&self) -> Result<(), DbError> {
        log::trace!("Store::ping() called.");

        let client = self.connect().await?;
        client.simple_query("SELECT 1").await
            .map_err(|e| DbError::from(e).annotate("Ping failed"))?;
        Ok(())
    }
}

#[async_trait]
impl Records for Store {
    async fn session(&self, key: &str) -> Result<Option<Session>, DbError> {
        self.get_session(key).await
    }

    async fn count_access(
        &self,
        user_id: i64,
        role: Role,
        scope: Scope,
        pattern: &str,
    ) -> Result<i64, DbError> {
        self.get_access_count(user_id, role, scope, pattern).await
    }

    async fn user_details(&self, user_id: i64) -> Result<Option<Person>, DbError> {
        self.get_user_details(user_id).await
    }

    async fn class_instructor(&self, class_id: i64) -> Result<Option<Person>, DbError> {
        self.get_class_instructor(class_id).await
    }

    async fn enrolled_instructor(
        &self,
        student_id: i64,
        pattern: &str,
    ) -> Result<Option<Person>, DbError> {
        self.get_enrolled_instructor(student_id, pattern).await
    }
}

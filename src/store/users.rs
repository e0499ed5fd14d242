/*!
Display fields for users and instructors.
*/
use tokio_postgres::Row;

use super::{DbError, Store};
use crate::user::Person;

fn person_from_row(row: &Row) -> Result<Person, DbError> {
    log::trace!("person_from_row( {:?} ) called", row);

    let first: Option<String> = row.try_get("first_name")?;
    let last: Option<String> = row.try_get("last_name")?;
    let email: Option<String> = row.try_get("email")?;

    Ok(Person::from_names(
        first.as_deref().unwrap_or(""),
        last.as_deref().unwrap_or(""),
        email.unwrap_or_default(),
    ))
}

impl Store {
    pub async fn get_user_details(
        &self,
        user_id: i64,
    ) -> Result<Option<Person>, DbError> {
        log::trace!("Store::get_user_details( {} ) called.", &user_id);

        let client = self.connect().await?;
        let row = client.query_opt(
            "SELECT first_name, last_name, email FROM users
                WHERE id = $1::BIGINT",
            &[&user_id]
        ).await?;

        match row {
            Some(row) => Ok(Some(person_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_class_instructor(
        &self,
        class_id: i64,
    ) -> Result<Option<Person>, DbError> {
        log::trace!("Store::get_class_instructor( {} ) called.", &class_id);

        let client = self.connect().await?;
        let row = client.query_opt(
            "SELECT u.first_name, u.last_name, u.email FROM class_batches cb
                JOIN users u ON u.id = cb.instructor_id
            WHERE cb.id = $1::BIGINT",
            &[&class_id]
        ).await?;

        match row {
            Some(row) => Ok(Some(person_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_enrolled_instructor(
        &self,
        student_id: i64,
        pattern: &str,
    ) -> Result<Option<Person>, DbError> {
        log::trace!(
            "Store::get_enrolled_instructor( {}, {:?} ) called.",
            &student_id, pattern
        );

        let client = self.connect().await?;
        let row = client.query_opt(
            "SELECT u.first_name, u.last_name, u.email FROM enrollments e
                JOIN class_batches cb ON cb.id = e.class_id
                JOIN courses c ON c.id = cb.course_id
                JOIN users u ON u.id = cb.instructor_id
            WHERE e.student_id = $1::BIGINT
                AND e.status IN ('active', 'completed')
                AND c.title LIKE $2
            ORDER BY e.class_id DESC
            LIMIT 1",
            &[&student_id, &pattern]
        ).await?;

        match row {
            Some(row) => Ok(Some(person_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

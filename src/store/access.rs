/*!
The access-check `COUNT(*)` queries.

There are four of them: a student or an instructor, either anywhere in the
course or in one particular class batch. Students only count through
enrollments that are `active` or `completed`.
*/
use super::{DbError, Store};
use crate::access::Scope;
use crate::user::Role;

const STUDENT_GENERAL: &str = "
    SELECT COUNT(*) AS n FROM enrollments e
        JOIN class_batches cb ON cb.id = e.class_id
        JOIN courses c ON c.id = cb.course_id
    WHERE e.student_id = $1::BIGINT
        AND e.status IN ('active', 'completed')
        AND c.title LIKE $2";

const STUDENT_CLASS: &str = "
    SELECT COUNT(*) AS n FROM enrollments e
        JOIN class_batches cb ON cb.id = e.class_id
        JOIN courses c ON c.id = cb.course_id
    WHERE e.student_id = $1::BIGINT
        AND e.status IN ('active', 'completed')
        AND c.title LIKE $2
        AND e.class_id = $3::BIGINT";

const INSTRUCTOR_GENERAL: &str = "
    SELECT COUNT(*) AS n FROM class_batches cb
        JOIN courses c ON c.id = cb.course_id
    WHERE cb.instructor_id = $1::BIGINT
        AND c.title LIKE $2";

const INSTRUCTOR_CLASS: &str = "
    SELECT COUNT(*) AS n FROM class_batches cb
        JOIN courses c ON c.id = cb.course_id
    WHERE cb.instructor_id = $1::BIGINT
        AND c.title LIKE $2
        AND cb.id = $3::BIGINT";

impl Store {
    pub async fn get_access_count(
        &self,
        user_id: i64,
        role: Role,
        scope: Scope,
        pattern: &str,
    ) -> Result<i64, DbError> {
        log::trace!(
            "Store::get_access_count( {}, {}, {:?}, {:?} ) called.",
            &user_id, &role, &scope, pattern
        );

        let client = self.connect().await?;

        let row = match (role, scope) {
            (Role::Student, Scope::General) => client.query_one(
                STUDENT_GENERAL, &[&user_id, &pattern]
            ).await?,
            (Role::Student, Scope::Class(class_id)) => client.query_one(
                STUDENT_CLASS, &[&user_id, &pattern, &class_id]
            ).await?,
            (Role::Instructor, Scope::General) => client.query_one(
                INSTRUCTOR_GENERAL, &[&user_id, &pattern]
            ).await?,
            (Role::Instructor, Scope::Class(class_id)) => client.query_one(
                INSTRUCTOR_CLASS, &[&user_id, &pattern, &class_id]
            ).await?,
        };

        let n: i64 = row.try_get("n")?;
        log::trace!("    ...access count for user {}: {}", &user_id, &n);
        Ok(n)
    }
}

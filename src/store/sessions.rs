/*!
Reading sessions written by the portal's login subsystem.
*/
use super::{DbError, Store};
use crate::user::Session;

impl Store {
    pub async fn get_session(&self, key: &str) -> Result<Option<Session>, DbError> {
        log::trace!("Store::get_session( [ {} byte key ] ) called.", key.len());

        let client = self.connect().await?;
        let row = match client.query_opt(
            "SELECT user_id, user_role, user_email, first_name, last_name,
                    instructor_name, instructor_email
                FROM sessions WHERE key = $1",
            &[&key]
        ).await? {
            Some(row) => row,
            None => { return Ok(None); },
        };

        // A session row without a user id isn't a logged-in session.
        let user_id: Option<i64> = row.try_get("user_id")?;
        let user_id = match user_id {
            Some(n) => n,
            None => { return Ok(None); },
        };

        let user_role: Option<String> = row.try_get("user_role")?;
        let s = Session {
            user_id,
            user_role: user_role.unwrap_or_default(),
            user_email: row.try_get("user_email")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            instructor_name: row.try_get("instructor_name")?,
            instructor_email: row.try_get("instructor_email")?,
        };

        Ok(Some(s))
    }
}

/*!
Deciding whether a user may see a material.

The decision is a plain existence check: does at least one enrollment (for
students) or class batch (for instructors) tie the user to a course whose
title contains the configured course filter, optionally restricted to one
class batch?
*/
use crate::store::{DbError, Records};
use crate::user::Role;

/// What a request is asking to see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Any class of the course.
    General,
    /// One particular class batch.
    Class(i64),
}

impl Scope {
    /**
    Interpret the raw `class_id` query parameter.

    Only a positive integer scopes the request to a class; a missing, empty,
    zero, negative or otherwise unparseable value means no class was asked
    for.
    */
    pub fn from_param(class_id: Option<&str>) -> Scope {
        match class_id.map(|s| s.trim().parse::<i64>()) {
            Some(Ok(n)) if n > 0 => Scope::Class(n),
            _ => Scope::General,
        }
    }

    pub fn class_id(&self) -> Option<i64> {
        match self {
            Scope::General => None,
            Scope::Class(n) => Some(*n),
        }
    }
}

/// How a request that fails the access check gets turned away.
#[derive(Debug, PartialEq, Eq)]
pub enum Denial {
    /// Send them back to their dashboard.
    Redirect(String),
    /// They asked for a specific class that isn't theirs; the 403 page
    /// links back to this dashboard.
    Forbidden(String),
}

/**
Wrap `filter` in `%` for a `LIKE` substring match.

Backslash, `%`, and `_` in the filter itself are escaped so they match
literally.
*/
pub fn like_pattern(filter: &str) -> String {
    let mut pat = String::with_capacity(filter.len() + 2);
    pat.push('%');
    for c in filter.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pat.push('\\');
        }
        pat.push(c);
    }
    pat.push('%');
    pat
}

/// `true` if `user_id` acting as `role` may see material within `scope`.
pub async fn has_access(
    records: &dyn Records,
    user_id: i64,
    role: Role,
    scope: Scope,
    course_filter: &str,
) -> Result<bool, DbError> {
    log::trace!(
        "has_access( [ Records ], {}, {}, {:?}, {:?} ) called.",
        &user_id, &role, &scope, course_filter
    );

    let pattern = like_pattern(course_filter);
    let n = records.count_access(user_id, role, scope, &pattern).await?;
    Ok(n > 0)
}

/// Where a denied request goes, given the dashboard path for each role.
pub fn denial(
    role: Role,
    scope: Scope,
    student_dashboard: &str,
    instructor_dashboard: &str,
) -> Denial {
    let dashboard = match role {
        Role::Student => student_dashboard.to_owned(),
        Role::Instructor => instructor_dashboard.to_owned(),
    };

    match scope {
        Scope::Class(_) => Denial::Forbidden(dashboard),
        Scope::General => Denial::Redirect(dashboard),
    }
}

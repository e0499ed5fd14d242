/*!
Users as this service sees them: the role and cached fields carried in a
session, and the display fields shown on the materials.
*/
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Student,
    Instructor,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let token = match self {
            Role::Student    => "student",
            Role::Instructor => "instructor",
        };

        write!(f, "{}", token)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student"    => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            _ => Err(format!("{:?} is not an allowed Role.", s)),
        }
    }
}

/**
A session as it comes out of the session store.

`user_role` is kept as the raw string; anything other than `"student"` or
`"instructor"` is not allowed to view materials. The `Option` fields are
values cached at login, used when the database can't supply them.
*/
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub user_id: i64,
    pub user_role: String,
    pub user_email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub instructor_name: Option<String>,
    pub instructor_email: Option<String>,
}

impl Session {
    /// `Some(Role)` if this session's role may view materials.
    pub fn role(&self) -> Option<Role> {
        self.user_role.parse().ok()
    }

    /// The user's display fields as cached in the session, if there are any.
    pub fn cached_user(&self) -> Option<Person> {
        let name = Person::join_name(
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or(""),
        );
        let email = self.user_email.clone().unwrap_or_default();

        if name.is_empty() && email.is_empty() {
            None
        } else {
            Some(Person { name, email })
        }
    }

    /// The instructor's display fields as cached in the session.
    pub fn cached_instructor(&self) -> Option<Person> {
        match (&self.instructor_name, &self.instructor_email) {
            (None, None) => None,
            (name, email) => Some(Person {
                name: name.clone().unwrap_or_default(),
                email: email.clone().unwrap_or_default(),
            }),
        }
    }
}

/// Name and email, as displayed on a material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Person {
    pub name: String,
    pub email: String,
}

impl Person {
    pub fn from_names(first: &str, last: &str, email: String) -> Person {
        Person {
            name: Person::join_name(first, last),
            email,
        }
    }

    fn join_name(first: &str, last: &str) -> String {
        let (first, last) = (first.trim(), last.trim());
        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{} {}", first, last),
            (false, true) => first.to_owned(),
            (true, false) => last.to_owned(),
            (true, true) => String::new(),
        }
    }
}

/*!
The catalog of viewable materials.
*/

/// Course code printed on every material and used in PDF file names.
pub const COURSE_CODE: &str = "MO-100";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Syllabus,
    Handout { week: u8 },
}

#[derive(Debug)]
pub struct Material {
    /// URL path segment, as in `/materials/<slug>`.
    pub slug: &'static str,
    pub title: &'static str,
    /// Prefix of the PDF file name.
    pub topic: &'static str,
    /// Name of the handlebars template holding the content.
    pub template: &'static str,
    pub kind: Kind,
}

pub static CATALOG: &[Material] = &[
    Material {
        slug: "syllabus",
        title: "Course Syllabus",
        topic: "MO-100_Syllabus",
        template: "syllabus",
        kind: Kind::Syllabus,
    },
    Material {
        slug: "week-1",
        title: "Week 1: Documents and Navigation",
        topic: "MO-100_Week1_Documents",
        template: "handout_week1",
        kind: Kind::Handout { week: 1 },
    },
    Material {
        slug: "week-2",
        title: "Week 2: Inserting and Formatting Text",
        topic: "MO-100_Week2_Formatting",
        template: "handout_week2",
        kind: Kind::Handout { week: 2 },
    },
    Material {
        slug: "week-3",
        title: "Week 3: Tables and Lists",
        topic: "MO-100_Week3_Tables_Lists",
        template: "handout_week3",
        kind: Kind::Handout { week: 3 },
    },
    Material {
        slug: "week-4",
        title: "Week 4: References, Graphics, and Exam Review",
        topic: "MO-100_Week4_References_Review",
        template: "handout_week4",
        kind: Kind::Handout { week: 4 },
    },
];

pub fn by_slug(slug: &str) -> Option<&'static Material> {
    CATALOG.iter().find(|m| m.slug == slug)
}

impl Material {
    /// `Some(n)` for the handout of week `n`.
    pub fn week(&self) -> Option<u8> {
        match self.kind {
            Kind::Syllabus => None,
            Kind::Handout { week } => Some(week),
        }
    }
}

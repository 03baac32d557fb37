//! Record transformer
//!
//! Maps raw lesson records into the normalized course schema. The mapping is
//! total: any missing or oddly shaped field falls back to `""` or `0.0`.

mod lookup;

pub use lookup::{array_at, get_path, number_at, string_at};

use crate::crawler::RawRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A normalized course record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course name (`course.nameZh`)
    pub name: String,

    /// Lesson code (`code`)
    pub no: String,

    /// Teacher names, comma-joined in list order
    pub teachers: String,

    /// Credit value (`course.credits`)
    pub credits: f64,

    /// Offering department (`openDepartment.nameZh`)
    pub department: String,
}

/// Maps one raw record into a `Course`
///
/// # Example
///
/// ```
/// use course_crawler::transform;
/// use serde_json::json;
///
/// let raw = json!({"code": "MATH101", "course": {"credits": 4}});
/// let course = transform(raw.as_object().unwrap());
/// assert_eq!(course.no, "MATH101");
/// assert_eq!(course.credits, 4.0);
/// assert_eq!(course.name, "");
/// ```
pub fn transform(raw: &RawRecord) -> Course {
    Course {
        name: string_at(raw, &["course", "nameZh"]).unwrap_or_default(),
        no: string_at(raw, &["code"]).unwrap_or_default(),
        teachers: join_teachers(raw),
        credits: number_at(raw, &["course", "credits"]).unwrap_or(0.0),
        department: string_at(raw, &["openDepartment", "nameZh"]).unwrap_or_default(),
    }
}

/// Maps every record, preserving order
pub fn transform_all(records: &[RawRecord]) -> Vec<Course> {
    records.iter().map(transform).collect()
}

/// Teacher names in assignment order; entries without a name are skipped
fn join_teachers(raw: &RawRecord) -> String {
    let Some(assignments) = array_at(raw, &["teacherAssignmentList"]) else {
        return String::new();
    };

    assignments
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|assignment| string_at(assignment, &["person", "nameZh"]))
        .collect::<Vec<_>>()
        .join(",")
}

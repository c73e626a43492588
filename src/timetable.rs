/*
Exam timetabling on top of the coloring engine:
 - exams are vertices, two exams conflict if a student is enrolled in both
 - colors are timeslots
*/
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::time::Instant;

use dogs::search_algorithm::TimeStoppingCriterion;
use log::info;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::color::{Coloring, Solution, VertexId, nb_colors, to_partition};
use crate::graph::{Graph, GraphError};
use crate::search::coloring_bnb::{exact_search, DEFAULT_CHECK_INTERVAL};
use crate::search::greedy_dsatur::greedy_dsatur;

/// errors raised while building a timetable
#[derive(Debug, Error)]
pub enum TimetableError {
    /// invalid exam index
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// a student is enrolled in an exam that is not declared
    #[error("student {student:?} is enrolled in the unknown exam {exam:?}")]
    UnknownExam {
        /// student name
        student: String,
        /// exam name
        exam: String,
    },
    /// an exam is declared twice
    #[error("exam {0:?} is declared twice")]
    DuplicateExam(String),
    /// malformed enrollment file
    #[error("unable to parse the enrollments: {0}")]
    Json(#[from] serde_json::Error),
    /// the enrollment file could not be read
    #[error("unable to read the enrollments: {0}")]
    Io(#[from] std::io::Error),
}

/**
builds the conflict graph: exams are vertices and every pair of exams taken by the same
student is an edge. enrollments[s]: exams taken by student s.
*/
pub fn conflict_graph(nb_exams:usize, enrollments:&[Vec<VertexId>]) -> Result<Graph, GraphError> {
    let mut res = Graph::new(nb_exams);
    for exams in enrollments {
        for (i,a) in exams.iter().enumerate() {
            for b in &exams[i+1..] {
                res.add_edge(*a, *b)?;
            }
        }
    }
    Ok(res)
}

/// algorithm used to build a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Algorithm {
    /// branch and bound (optimal if it finishes in time)
    Exact,
    /// greedy DSATUR
    Dsatur,
}

/// scheduling parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleOptions {
    /// graphs with fewer vertices are solved with the exact solver
    pub exact_threshold: usize,
    /// time limit (seconds) of the exact solver
    pub timeout: f32,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self { exact_threshold: 8, timeout: 10. }
    }
}

/// timetable: slot assigned to each exam
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    /// algorithm used
    pub algorithm: Algorithm,
    /// colors[e]: slot of exam e
    pub colors: Coloring,
    /// slots[s]: exams in slot s
    pub slots: Solution,
    /// number of slots
    pub nb_slots: usize,
    /// true if the number of slots is proven minimal
    pub optimal: bool,
    /// computation time (seconds)
    pub elapsed: f32,
}

/// assigns a slot to each exam (exact solver for small graphs, DSATUR otherwise)
pub fn schedule(inst:&Graph, options:&ScheduleOptions) -> Schedule {
    let t_start = Instant::now();
    let (algorithm, colors, optimal) = if inst.nb_vertices() < options.exact_threshold {
        let timeout = options.timeout;
        let res = exact_search(inst, || TimeStoppingCriterion::new(timeout), DEFAULT_CHECK_INTERVAL);
        (Algorithm::Exact, res.colors, res.optimal)
    } else {
        (Algorithm::Dsatur, greedy_dsatur(inst), false)
    };
    let elapsed = t_start.elapsed().as_secs_f32();
    let nb_slots = nb_colors(&colors);
    info!("{:?}: {} exams -> {} timeslots ({:.1}ms)", algorithm, inst.nb_vertices(), nb_slots, elapsed*1000.);
    Schedule { algorithm, slots: to_partition(&colors), colors, nb_slots, optimal, elapsed }
}

/** enrollment file: declared exams and, for each student, the exams they take */
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnrollmentFile {
    /// exam names (exam i is vertex i)
    pub exams: Vec<String>,
    /// student name -> exam names
    pub students: BTreeMap<String, Vec<String>>,
}

impl EnrollmentFile {
    /** reads an enrollment file (JSON) */
    pub fn from_file<P:AsRef<Path>>(filename:P) -> Result<Self, TimetableError> {
        Self::from_json(&fs::read_to_string(filename)?)
    }

    /** parses an enrollment file (JSON) */
    pub fn from_json(s:&str) -> Result<Self, TimetableError> {
        Ok(serde_json::from_str(s)?)
    }

    /** builds the conflict graph between the exams */
    pub fn conflict_graph(&self) -> Result<Graph, TimetableError> {
        let mut exam_ids:HashMap<&str, VertexId> = HashMap::with_capacity(self.exams.len());
        for (i,exam) in self.exams.iter().enumerate() {
            if exam_ids.insert(exam.as_str(), i).is_some() {
                return Err(TimetableError::DuplicateExam(exam.clone()));
            }
        }
        let mut enrollments = Vec::with_capacity(self.students.len());
        for (student, exams) in &self.students {
            let ids = exams.iter().map(|exam| {
                exam_ids.get(exam.as_str()).copied().ok_or_else(|| TimetableError::UnknownExam {
                    student: student.clone(),
                    exam: exam.clone(),
                })
            }).collect::<Result<Vec<VertexId>, TimetableError>>()?;
            enrollments.push(ids);
        }
        Ok(conflict_graph(self.exams.len(), &enrollments)?)
    }

    /** exam names of each slot */
    pub fn slot_names(&self, schedule:&Schedule) -> Vec<Vec<String>> {
        schedule.slots.iter()
            .map(|slot| slot.iter().map(|e| self.exams[*e].clone()).collect())
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::color::{checker, CheckerResult};

    const ENROLLMENTS:&str = r#"{
        "exams": ["math", "physics", "chemistry", "biology", "history"],
        "students": {
            "alice": ["math", "physics"],
            "bob": ["physics", "chemistry"],
            "carol": ["math", "chemistry"],
            "dave": ["biology", "history"]
        }
    }"#;

    #[test]
    fn test_conflict_graph() {
        let inst = conflict_graph(4, &[vec![0,1,2], vec![2,3], vec![]]).unwrap();
        assert_eq!(inst.nb_edges(), 4);
        assert!(inst.are_adjacent(0, 2));
        assert!(!inst.are_adjacent(0, 3));
    }

    #[test]
    fn test_conflict_graph_out_of_range() {
        assert_eq!(
            conflict_graph(2, &[vec![0,4]]),
            Err(GraphError::VertexOutOfRange { vertex: 4, n: 2 })
        );
    }

    #[test]
    fn test_schedule_small_uses_exact() {
        let file = EnrollmentFile::from_json(ENROLLMENTS).unwrap();
        let inst = file.conflict_graph().unwrap();
        let res = schedule(&inst, &ScheduleOptions::default());
        assert_eq!(res.algorithm, Algorithm::Exact);
        assert!(res.optimal);
        assert_eq!(res.nb_slots, 3);
        assert_eq!(checker(&inst, &res.colors), CheckerResult::Ok(3));
        let names = file.slot_names(&res);
        assert_eq!(names.iter().map(|s| s.len()).sum::<usize>(), 5);
    }

    #[test]
    fn test_schedule_large_uses_dsatur() {
        let inst = conflict_graph(10, &[vec![0,1], vec![2,3]]).unwrap();
        let res = schedule(&inst, &ScheduleOptions::default());
        assert_eq!(res.algorithm, Algorithm::Dsatur);
        assert_eq!(res.nb_slots, 2);
        assert_eq!(res.slots.len(), 2);
    }

    #[test]
    fn test_unknown_exam() {
        let file = EnrollmentFile::from_json(
            r#"{"exams": ["math"], "students": {"alice": ["math", "art"]}}"#
        ).unwrap();
        assert!(matches!(
            file.conflict_graph(),
            Err(TimetableError::UnknownExam { ref exam, .. }) if exam == "art"
        ));
    }

    #[test]
    fn test_duplicate_exam() {
        let file = EnrollmentFile::from_json(r#"{"exams": ["math", "math"], "students": {}}"#).unwrap();
        assert!(matches!(file.conflict_graph(), Err(TimetableError::DuplicateExam(_))));
    }
}

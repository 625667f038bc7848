use prereq_engine::{
    CourseId, CourseSummary, EligibilityService, GroupId, GroupType, MemoryStore, Programme,
    ProgrammeId, RuleRow, Semester, StudentId,
};

fn main() {
    let cs111 = CourseId(1);
    let ma111 = CourseId(2);
    let ma161 = CourseId(3);
    let cs218 = CourseId(4);
    let student = StudentId(2024001);

    // CS218 requires CS111 and one of MA111 / MA161.
    let store = MemoryStore::new()
        .programme(
            Programme::new(ProgrammeId(1), "BSE", "Bachelor of Software Engineering"),
            vec![cs111, ma111, ma161, cs218],
        )
        .course(CourseSummary::new(cs111, "CS111", "Introduction to Computing", 850.0))
        .course(CourseSummary::new(ma111, "MA111", "Calculus I", 700.0))
        .course(CourseSummary::new(ma161, "MA161", "Discrete Mathematics", 700.0))
        .course(CourseSummary::new(cs218, "CS218", "Mobile Computing", 900.0).offered_in(false, true))
        .rules(
            cs218,
            vec![
                RuleRow::new(cs218, GroupId(1), GroupType::And).requires(cs111).top_level(),
                RuleRow::new(cs218, GroupId(1), GroupType::And).child(GroupId(2)).top_level(),
                RuleRow::new(cs218, GroupId(2), GroupType::Or).requires(ma111).nested(),
                RuleRow::new(cs218, GroupId(2), GroupType::Or).requires(ma161).nested(),
            ],
        )
        .student(student, Some(ProgrammeId(1)))
        .completed(student, &[cs111, ma161]);

    let service = EligibilityService::new(store);

    match service.eligible_courses_for_semester(student, Semester::Two) {
        Ok(courses) => {
            println!("Eligible in semester 2:");
            for course in courses {
                println!("  {course}");
            }
        }
        Err(err) => eprintln!("eligibility check failed: {err}"),
    }

    match service.explain(student, cs218) {
        Ok(report) => println!("{report}"),
        Err(err) => eprintln!("explain failed: {err}"),
    }
}

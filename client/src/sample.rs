//! Seed data for `init-sample-data` on the local backend.

use skillpath_types::{CourseId, RoadmapId, Skill, SkillId, StepId};
use skillpath_types::{Roadmap, RoadmapStep};

/// A course in the catalog, before enrollment.
#[derive(Debug, Clone)]
pub(crate) struct CatalogCourse {
    pub id: CourseId,
    pub title: String,
    pub total_lessons: u32,
    pub xp_reward: u32,
    pub thumbnail: String,
    pub category: String,
}

/// Total XP the sample user starts with.
pub(crate) const SAMPLE_TOTAL_XP: u64 = 1250;

fn skill(id: &str, name: &str, category: &str, level: u32, xp: u32, color: &str) -> Skill {
    Skill {
        id: SkillId::new(id),
        name: name.to_string(),
        level,
        xp,
        max_xp: skillpath_types::DEFAULT_MAX_XP,
        category: category.to_string(),
        color: color.to_string(),
    }
}

pub(crate) fn skills() -> Vec<Skill> {
    vec![
        skill("skill-react", "React", "Frontend", 8, 750, "#61dafb"),
        skill("skill-typescript", "TypeScript", "Frontend", 6, 420, "#3178c6"),
        skill("skill-node", "Node.js", "Backend", 5, 980, "#68a063"),
        skill("skill-python", "Python", "Backend", 4, 300, "#3776ab"),
        skill("skill-sql", "SQL", "Data", 3, 150, "#f29111"),
        skill("skill-ui", "UI Design", "Design", 2, 600, "#ff6b9d"),
    ]
}

fn course(
    id: &str,
    title: &str,
    total_lessons: u32,
    xp_reward: u32,
    thumbnail: &str,
    category: &str,
) -> CatalogCourse {
    CatalogCourse {
        id: CourseId::new(id),
        title: title.to_string(),
        total_lessons,
        xp_reward,
        thumbnail: thumbnail.to_string(),
        category: category.to_string(),
    }
}

pub(crate) fn catalog() -> Vec<CatalogCourse> {
    vec![
        course("course-react-patterns", "Advanced React Patterns", 24, 500, "⚛️", "Frontend"),
        course("course-typescript", "TypeScript Deep Dive", 18, 400, "📘", "Frontend"),
        course("course-node", "Node.js Microservices", 30, 600, "🟢", "Backend"),
        course("course-ml", "Machine Learning Basics", 20, 700, "🤖", "Data"),
    ]
}

/// `(course id, completed lessons)` enrolled by the sample data.
pub(crate) fn enrollments() -> Vec<(CourseId, u32)> {
    vec![
        (CourseId::new("course-react-patterns"), 16),
        (CourseId::new("course-typescript"), 6),
        (CourseId::new("course-node"), 3),
    ]
}

fn step(order: u32, id: &str, title: &str, description: &str, xp: u32, completed: bool) -> RoadmapStep {
    RoadmapStep {
        id: StepId::new(id),
        title: title.to_string(),
        description: description.to_string(),
        completed,
        xp,
        order,
    }
}

pub(crate) fn roadmap() -> Roadmap {
    Roadmap {
        id: RoadmapId::new("roadmap-fullstack"),
        title: "Full-Stack Developer".to_string(),
        steps: vec![
            step(1, "step-html-css", "HTML & CSS Fundamentals", "Semantic markup, layout, and responsive design", 100, true),
            step(2, "step-javascript", "JavaScript Essentials", "Closures, promises, and the event loop", 150, true),
            step(3, "step-react", "React Framework", "Components, hooks, and state management", 200, false),
            step(4, "step-node", "Backend with Node.js", "REST APIs, middleware, and authentication", 250, false),
            step(5, "step-databases", "Databases & SQL", "Schema design, joins, and indexing", 200, false),
            step(6, "step-deploy", "Deploy to Production", "CI pipelines, containers, and monitoring", 300, false),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::{catalog, enrollments, roadmap, skills};

    #[test]
    fn enrollments_reference_catalog_courses() {
        let catalog = catalog();
        for (id, completed) in enrollments() {
            let course = catalog.iter().find(|c| c.id == id).unwrap();
            assert!(completed < course.total_lessons);
        }
    }

    #[test]
    fn sample_skills_respect_max_xp() {
        assert!(skills().iter().all(|s| s.xp < s.max_xp));
    }

    #[test]
    fn roadmap_steps_are_ordered_and_partly_done() {
        let roadmap = roadmap();
        let orders: Vec<u32> = roadmap.steps.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(roadmap.completion_percent(), 33);
    }
}

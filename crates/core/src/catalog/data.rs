use std::collections::BTreeMap;

use url::Url;

use super::CatalogError;
use crate::model::{
    GradeBand, Question, Quiz, QuizSlug, Resource, ResourceId, ResourceType, ScheduledSession,
    SessionId, SessionKind, Topic, Tutor, TutorId,
};

fn question(id: &str, prompt: &str, choices: &[&str], correct: usize, explanation: &str) -> Question {
    Question::new(
        id,
        prompt,
        choices.iter().map(|c| (*c).to_string()).collect(),
        correct,
        explanation,
    )
}

fn quiz(slug: &str, title: &str, topic: Topic, questions: Vec<Question>) -> Result<Quiz, CatalogError> {
    Quiz::new(QuizSlug::new(slug), title, topic, questions).map_err(|source| CatalogError::Quiz {
        slug: slug.to_string(),
        source,
    })
}

pub(super) fn quizzes() -> Result<Vec<Quiz>, CatalogError> {
    Ok(vec![
        quiz(
            "algebra-basics",
            "Algebra Basics: Linear Equations",
            Topic::Algebra,
            vec![
                question(
                    "q1",
                    "Solve: 2x + 5 = 17",
                    &["x = 6", "x = 5", "x = 7", "x = 11"],
                    0,
                    "Subtract 5: 2x = 12. Divide by 2: x = 6.",
                ),
                question(
                    "q2",
                    "What is the slope of y = 3x - 4?",
                    &["-4", "3", "4", "1/3"],
                    1,
                    "In slope-intercept form y = mx + b, m is the slope. Here m = 3.",
                ),
                question(
                    "q3",
                    "Which equation is equivalent to y - 2 = 5(x + 1)?",
                    &["y = 5x + 7", "y = 5x - 3", "y = x + 7", "y = 7x + 5"],
                    0,
                    "Distribute: y - 2 = 5x + 5. Add 2 to both sides: y = 5x + 7.",
                ),
                question(
                    "q4",
                    "Solve: 3(x - 2) = 12",
                    &["x = 2", "x = 6", "x = 8", "x = 10"],
                    1,
                    "Divide both sides by 3: x - 2 = 4. Add 2: x = 6.",
                ),
                question(
                    "q5",
                    "If f(x) = 2x + 1, what is f(4)?",
                    &["7", "8", "9", "10"],
                    2,
                    "Plug in 4: f(4) = 2(4) + 1 = 8 + 1 = 9.",
                ),
            ],
        )?,
        quiz(
            "geometry-angles",
            "Geometry Basics: Angles & Triangles",
            Topic::Geometry,
            vec![
                question(
                    "g1",
                    "Complementary angles add up to:",
                    &["90°", "180°", "360°", "45°"],
                    0,
                    "Complementary angles sum to 90°.",
                ),
                question(
                    "g2",
                    "Supplementary angles add up to:",
                    &["90°", "180°", "360°", "270°"],
                    1,
                    "Supplementary angles sum to 180°.",
                ),
                question(
                    "g3",
                    "The sum of interior angles in a triangle is:",
                    &["90°", "180°", "270°", "360°"],
                    1,
                    "The interior angles of any triangle add to 180°.",
                ),
                question(
                    "g4",
                    "If two angles of a triangle are 50° and 60°, the third angle is:",
                    &["60°", "70°", "80°", "90°"],
                    1,
                    "50 + 60 = 110. 180 - 110 = 70°, so the third angle is 70°.",
                ),
                question(
                    "g5",
                    "Vertical angles are:",
                    &[
                        "Always equal",
                        "Always supplementary",
                        "Always complementary",
                        "Never equal",
                    ],
                    0,
                    "Vertical angles are opposite angles formed by intersecting lines and are always equal.",
                ),
            ],
        )?,
    ])
}

#[allow(clippy::too_many_arguments)]
fn resource(
    id: &str,
    title: &str,
    kind: ResourceType,
    topic: Topic,
    grade: GradeBand,
    description: &str,
    url: &str,
    tags: &[&str],
) -> Result<Resource, CatalogError> {
    let url = Url::parse(url).map_err(|err| CatalogError::InvalidUrl {
        id: id.to_string(),
        reason: err.to_string(),
    })?;
    Ok(Resource {
        id: ResourceId::new(id),
        title: title.to_string(),
        kind,
        topic,
        grade,
        description: description.to_string(),
        url,
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        tutors: Vec::new(),
    })
}

pub(super) fn resources() -> Result<Vec<Resource>, CatalogError> {
    Ok(vec![
        resource(
            "r1",
            "Linear Functions: Slope + Intercept",
            ResourceType::Lesson,
            Topic::Algebra,
            GradeBand::Ninth,
            "Understand slope, intercepts, and writing equations from graphs and tables.",
            "https://www.khanacademy.org/math/algebra",
            &["slope", "y-intercept", "graphing"],
        )?,
        resource(
            "r2",
            "Factoring Essentials",
            ResourceType::Practice,
            Topic::Algebra,
            GradeBand::Ninth,
            "Factor GCF, trinomials, and special products with quick checks.",
            "https://www.khanacademy.org/math/algebra",
            &["factoring", "trinomial", "gcf"],
        )?,
        resource(
            "r3",
            "Triangle Similarity + Proofs",
            ResourceType::Lesson,
            Topic::Geometry,
            GradeBand::Tenth,
            "Use similarity criteria to solve problems and support geometric reasoning.",
            "https://www.khanacademy.org/math/geometry",
            &["similarity", "proof", "triangles"],
        )?,
        resource(
            "r4",
            "Unit Circle Quick Review",
            ResourceType::Video,
            Topic::Trig,
            GradeBand::Eleventh,
            "Key angles, sine/cosine values, and converting degrees to radians.",
            "https://www.khanacademy.org/math/trigonometry",
            &["unit circle", "radians", "special angles"],
        )?,
        resource(
            "r5",
            "Precalc: Functions & Transformations",
            ResourceType::Lesson,
            Topic::Precalc,
            GradeBand::Eleventh,
            "Shifts, stretches, reflections, and composing functions.",
            "https://www.khanacademy.org/math/precalculus",
            &["transformations", "functions", "composition"],
        )?,
        resource(
            "r6",
            "Statistics Basics: Mean, Median, Spread",
            ResourceType::Lesson,
            Topic::Statistics,
            GradeBand::Twelfth,
            "Interpret data using center + variability (IQR, standard deviation).",
            "https://www.khanacademy.org/math/statistics-probability",
            &["mean", "median", "standard deviation", "IQR"],
        )?,
        resource(
            "r7",
            "SAT/PSAT Math Strategy Sheet",
            ResourceType::Download,
            Topic::SatPsat,
            GradeBand::Eleventh,
            "High-yield strategies, common traps, and pacing tips.",
            "https://satsuite.collegeboard.org/",
            &["strategy", "pacing", "traps"],
        )?,
        resource(
            "r8",
            "Geometry Circles Practice Set",
            ResourceType::Practice,
            Topic::Geometry,
            GradeBand::Tenth,
            "Arcs, angles, tangents, and chord relationships.",
            "https://www.khanacademy.org/math/geometry",
            &["circles", "tangent", "arcs"],
        )?,
    ])
}

#[allow(clippy::too_many_arguments)]
fn tutor(
    id: &str,
    name: &str,
    headline: &str,
    bio: &str,
    topics: &[Topic],
    strengths: &[&str],
    availability: &str,
    photo: &str,
) -> Tutor {
    Tutor {
        id: TutorId::new(id),
        name: name.to_string(),
        role: "PeerPilot Tutor • High School".to_string(),
        headline: headline.to_string(),
        bio: bio.to_string(),
        topics: topics.to_vec(),
        strengths: strengths.iter().map(|s| (*s).to_string()).collect(),
        availability: availability.to_string(),
        photo: photo.to_string(),
    }
}

pub(super) fn tutors() -> Vec<Tutor> {
    vec![
        tutor(
            "rey-garg",
            "Rey Garg",
            "Strategy-first SAT/PSAT + step-by-step clarity",
            "I focus on turning confusing problems into a repeatable process. We'll build speed without skipping understanding, especially for SAT/PSAT-style questions where small mistakes cost big points.",
            &[
                Topic::SatPsat,
                Topic::Algebra,
                Topic::Trig,
                Topic::Precalc,
                Topic::ApPrecalcSinusoidal,
            ],
            &[
                "SAT/PSAT math",
                "Algebra foundations",
                "Fast checking methods",
                "Test strategy",
            ],
            "Online only • After school + weekends",
            "/tutors/rey.jpg",
        ),
        tutor(
            "brody-shnayder",
            "Brody Shnayder",
            "Patient, structured help for homework + quizzes",
            "If you understand it in class but get stuck at home, I'm here for that. I explain slowly, reinforce the basics, then help you practice until it feels automatic.",
            &[
                Topic::Algebra,
                Topic::Geometry,
                Topic::Precalc,
                Topic::ApPrecalcSinusoidal,
            ],
            &[
                "Homework support",
                "Confidence building",
                "Clean notebook-style steps",
                "Concept review",
            ],
            "Online only • Flexible scheduling",
            "/tutors/brody.jpg",
        ),
        tutor(
            "britton-bloch",
            "Britton Bloch",
            "Visual explanations (diagrams, patterns, shortcuts)",
            "I teach math in a super visual way: diagrams, patterns, and simple rules you can remember under pressure. Great if geometry or word problems feel confusing.",
            &[Topic::Geometry, Topic::Algebra, Topic::SatPsat],
            &[
                "Geometry visuals",
                "Pattern recognition",
                "Smart shortcuts",
                "Clear explanations",
            ],
            "Online only • Evenings",
            "/tutors/britton.jpg",
        ),
        tutor(
            "darius-asadi",
            "Darius Asadi",
            "Efficient solving + pro-level error checking",
            "My style is all about efficiency: set up the problem correctly, solve cleanly, and verify fast. I'll show you how to catch mistakes before they cost points.",
            &[Topic::Algebra, Topic::Trig, Topic::SatPsat],
            &[
                "Error-checking systems",
                "Algebra techniques",
                "Pacing",
                "Multiple solution paths",
            ],
            "Online only • Weeknights",
            "/tutors/darius.jpg",
        ),
        tutor(
            "aarav-patel",
            "Aarav Patel",
            "Functions + precalc (graphs, transformations, intuition)",
            "Functions are the key to so much math. I'm great at graphs, transformations, and 'why it works' thinking so you aren't just memorizing steps.",
            &[Topic::Precalc, Topic::Algebra, Topic::Statistics],
            &[
                "Functions & graphs",
                "Precalc foundations",
                "Explaining the \"why\"",
                "Practice planning",
            ],
            "Online only • Weekends preferred",
            "/tutors/aarav.jpg",
        ),
        tutor(
            "eric-lybman",
            "Eric Lybman",
            "Calm coaching for stats + data + word problems",
            "I keep things calm and organized, especially for word problems and data questions. We'll translate the question into math and build a consistent method.",
            &[Topic::Statistics, Topic::SatPsat, Topic::Algebra],
            &[
                "Data analysis",
                "Statistics concepts",
                "Word problems",
                "Organizing steps",
            ],
            "Online only • After school",
            "/tutors/eric.jpg",
        ),
    ]
}

pub(super) fn topic_tutors() -> BTreeMap<Topic, Vec<TutorId>> {
    let ids = |names: &[&str]| names.iter().map(|n| TutorId::new(*n)).collect::<Vec<_>>();
    BTreeMap::from([
        (
            Topic::Algebra,
            ids(&["rey-garg", "darius-asadi", "brody-shnayder"]),
        ),
        (Topic::Geometry, ids(&["britton-bloch", "brody-shnayder"])),
        (Topic::Trig, ids(&["rey-garg", "darius-asadi"])),
        (Topic::Precalc, ids(&["aarav-patel", "brody-shnayder"])),
        (Topic::Statistics, ids(&["eric-lybman", "aarav-patel"])),
        (
            Topic::SatPsat,
            ids(&["rey-garg", "darius-asadi", "britton-bloch", "eric-lybman"]),
        ),
        (
            Topic::ApPrecalcSinusoidal,
            ids(&["rey-garg", "brody-shnayder"]),
        ),
    ])
}

#[allow(clippy::too_many_arguments)]
fn session(
    id: &str,
    title: &str,
    kind: SessionKind,
    level: Topic,
    day: &str,
    time: &str,
    location: &str,
    spots: (u32, u32),
) -> ScheduledSession {
    ScheduledSession {
        id: SessionId::new(id),
        title: title.to_string(),
        kind,
        level,
        day: day.to_string(),
        time: time.to_string(),
        location: location.to_string(),
        spots_total: spots.0,
        spots_left: spots.1,
    }
}

pub(super) fn sessions() -> Vec<ScheduledSession> {
    vec![
        session(
            "s1",
            "1:1 Algebra Help",
            SessionKind::Tutoring,
            Topic::Algebra,
            "Monday",
            "4:00–4:30 PM",
            "Room 204 / Online",
            (6, 3),
        ),
        session(
            "s2",
            "Geometry Proofs Workshop",
            SessionKind::GroupStudy,
            Topic::Geometry,
            "Tuesday",
            "5:00–5:45 PM",
            "Library Table B",
            (10, 7),
        ),
        session(
            "s3",
            "Trig Essentials (Unit Circle)",
            SessionKind::Tutoring,
            Topic::Trig,
            "Wednesday",
            "4:15–4:45 PM",
            "Online",
            (6, 5),
        ),
        session(
            "s4",
            "Precalc Problem Set Sprint",
            SessionKind::GroupStudy,
            Topic::Precalc,
            "Thursday",
            "4:30–5:15 PM",
            "Room 118",
            (12, 9),
        ),
        session(
            "s5",
            "SAT/PSAT Math Strategies",
            SessionKind::GroupStudy,
            Topic::SatPsat,
            "Friday",
            "4:00–4:45 PM",
            "Online",
            (20, 14),
        ),
    ]
}

// Bundled example content for the example loader. Static text only — no
// request is involved in loading it.

/// Example resume filled in by the `example` command.
pub const EXAMPLE_RESUME: &str = r#"Ivan Petrov
Senior Python Developer

EXPERIENCE:
• NorthStar Tech (2020-2024) - Senior Python Developer
  - Built microservices with Django/FastAPI
  - Performance optimization work (40% improvement)
  - Mentored 5 developers

• Baltic Cloud (2018-2020) - Python Developer
  - Built APIs serving 1M+ users
  - Integrated external services
  - 85% test coverage

SKILLS:
Python, Django, FastAPI, PostgreSQL, Redis, Docker, Kubernetes, Git"#;

/// Example job posting paired with the resume above.
pub const EXAMPLE_JOB_DESCRIPTION: &str = r#"Company: TechCorp
Position: Senior Python Developer

Requirements:
• 5+ years of Python development experience
• Django/FastAPI
• Experience with microservices
• PostgreSQL, Redis
• Docker, Kubernetes
• Mentoring experience

Responsibilities:
• Backend service development
• Architecture decisions
• Mentoring junior developers
• Code review"#;

pub const EXAMPLE_COMPANY_NAME: &str = "TechCorp";

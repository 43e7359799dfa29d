// All LLM prompt constants for the skill matcher.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Persona for skill matching. Sent together with `JSON_ONLY_SYSTEM`.
pub const SKILL_MATCH_SYSTEM: &str = "You are a senior technical recruiter with deep \
    technology expertise. You reconcile job requirements against resume skills.";

/// Skill matching prompt template. Replace `{job_skills}` and `{resume_skills}` before sending.
pub const SKILL_MATCH_PROMPT_TEMPLATE: &str = r#"Analyze skill compatibility between a job posting and a resume.

CORE PRINCIPLES:
1. Full-stack developers with Node.js + React + PostgreSQL have most web development skills
2. Spring Boot developers know Java, REST APIs, enterprise patterns
3. Cloud experience (AWS/Azure) implies DevOps understanding
4. Modern frameworks imply their underlying languages (Next.js -> React -> JavaScript)

MATCHING RULES:
- Node.js experience -> JavaScript, REST API, Backend, Express, NPM
- React/Next.js -> JavaScript, Frontend, component-based, modern web
- Spring Boot -> Java, REST API, Microservices, enterprise development
- PostgreSQL/MySQL -> SQL, database design, query optimization
- Docker/Kubernetes -> DevOps, containerization, microservices
- Git -> version control, collaboration, code management
- Agile -> modern development practices, team collaboration

ANALYSIS APPROACH:
1. Find EXACT matches first
2. Identify ECOSYSTEM matches (Node.js covers many JavaScript skills)
3. Recognize FRAMEWORK families (React ecosystem)
4. Understand TECHNOLOGY stacks (MEAN, LAMP, etc.)
5. Consider DEVELOPMENT practices (Agile, DevOps)

Job requirements still unmatched: {job_skills}
Resume skills: {resume_skills}

Return a JSON object with this EXACT schema:
{
  "matched_skills": [
    {
      "job_skill": "JavaScript",
      "resume_skill": "Node.js",
      "match_type": "ecosystem",
      "confidence": 0.95,
      "reasoning": "Node.js is a JavaScript runtime environment"
    }
  ],
  "missing_skills": ["Only truly missing specialized skills"],
  "match_percentage": 85,
  "match_level": "Excellent Match",
  "analysis_summary": "Brief explanation of overall compatibility"
}

RULES:
- `job_skill` MUST be copied verbatim from the job requirements list above
- `resume_skill` MUST be copied verbatim from the resume skills list above
- `confidence` is a number between 0.0 and 1.0
- Be generous with ecosystem matches; do not mark basic skills missing if the person has the stack
- List only truly specialized skills as missing"#;

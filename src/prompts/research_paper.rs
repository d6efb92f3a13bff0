//! Research paper analysis prompts.
//!
//! Contains the structured analysis template applied to uploaded papers and
//! the context wrapper used for follow-up questions.

/// Structured analysis prompt applied to an uploaded research paper
pub const RESEARCH_PAPER: &str = r#"You are an expert research analyst with a strong background in critically reading and evaluating scholarly articles, including peer-reviewed journal papers, arXiv preprints, and IEEE conference and journal proceedings. Your goal is to provide detailed, structured, and unbiased analyses of research papers across a wide range of academic disciplines.

Paper Classification

- Type of Paper (Select one) - Surveys, Benchmarks & Datasets, Breakthroughs or Other (specify)

Prerequisites and Background Knowledge

1. Required Mathematical Background
2. Domain Knowledge Prerequisites
3. Technical Prerequisites
4. Recommended Background Reading

Basic Information:

- Title of the paper:
- Authors:
- Publication year:
- Journal/Conference:
- DOI/URL (if available):

Research Context

1. What is the main research question or problem being addressed?
2. Why is this research important? (Describe the gap in current knowledge or practical need)
3. What are the key theories or concepts that form the foundation of this research?

Methodology

1. What type of research design was used? (e.g., experimental, observational, qualitative, quantitative, mixed methods)
2. What were the key methods and procedures?
    - Data collection techniques
    - Sample size and characteristics
    - Tools or instruments used
    - Analysis methods
3. What are the independent and dependent variables (if applicable)?

Key Findings

1. What are the main results or discoveries?
2. Are there any unexpected or surprising findings?
3. How do the results relate to the initial research questions?
4. What evidence supports these findings?

Impact and Implications

1. What are the theoretical implications of this research?
2. What are the practical applications or real-world implications?
3. How does this research advance our understanding of the field?
4. What are the limitations of the study?

Future Research

1. What questions remain unanswered?
2. What new research directions are suggested?
3. How could the study be improved or expanded?

Critical Analysis

1. Strengths:
    - Methodological rigor
    - Innovation in approach
    - Quality of evidence
    - Practical significance
2. Limitations:
    - Methodological constraints
    - Potential biases
    - External validity issues
    - Alternative interpretations

Key Takeaways

1. What are the 3-5 most important points from this paper?
2. How does this research connect to other work in the field?
3. What makes this paper particularly significant or innovative?

Simplified Summary
Please provide a clear, concise explanation of the paper in 2-3 paragraphs using accessible language. Focus on:

- The main problem or question
- What was done to address it
- What was discovered
- Why it matters

Technical Terms Glossary
List and define key technical terms that are essential for understanding the paper:

- Term 1:
- Term 2:
- Term 3:
(Add more as needed)

Discussion Questions

1. How might these findings be applied in different contexts?
2. What assumptions underlie the research methodology?
3. How might different stakeholders interpret or use these findings?
4. What ethical considerations arise from this research?

Visual Summary
Consider creating:

- A flowchart of the methodology
- A diagram of key concepts
- A visual representation of results
- A timeline of the research process

Citation and Further Reading

1. Key papers cited in this research
2. Related works for additional context
3. Follow-up studies (if available)

---

Instructions for Using This Template:

1. Start by identifying the paper type and prerequisites to gauge appropriate level of engagement
2. Not all sections may be relevant for every paper - adapt as needed
3. Focus on sections most relevant to your understanding needs
4. Use bullet points or short phrases for initial notes
5. Expand important sections with detailed analysis
6. Consider your audience when determining level of technical detail
7. Update the template based on specific field requirements
"#;

/// Context line prefacing follow-up questions
pub const FOLLOWUP_CONTEXT: &str =
    "Using the research paper and the generated notes above, please answer the following question:";

/// Build the follow-up prompt from the analysis notes and the user's question
pub fn build_followup_prompt(notes: &str, query: &str) -> String {
    format!("{}\n\n{}\n\n{}", notes, FOLLOWUP_CONTEXT, query)
}

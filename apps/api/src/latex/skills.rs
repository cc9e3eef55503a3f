//! Skills formatter: one `Label: items` line per category, order preserved.

use crate::latex::escape::escape_latex;
use crate::latex::lines::bullet_text;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCategory {
    pub label: String,
    pub items: String,
}

pub fn parse_skills(content: &str) -> Vec<SkillCategory> {
    content
        .lines()
        .map(str::trim)
        .map(|l| bullet_text(l).unwrap_or(l))
        .filter_map(|l| l.split_once(':'))
        .map(|(label, items)| (label.trim(), items.trim()))
        .filter(|(label, items)| !label.is_empty() && !items.is_empty())
        .map(|(label, items)| SkillCategory {
            label: label.to_string(),
            items: items.to_string(),
        })
        .collect()
}

pub fn render_skills(categories: &[SkillCategory]) -> Option<String> {
    if categories.is_empty() {
        return None;
    }

    let mut latex =
        String::from("\\section{Technical Skills}\n \\begin{itemize}[leftmargin=0.15in, label={}]\n");
    for c in categories {
        latex.push_str(&format!(
            "    \\small{{\\item{{\n     \\textbf{{{}}}{{: {}}} \\\\\n    }}}}\n",
            escape_latex(&c.label),
            escape_latex(&c.items),
        ));
    }
    latex.push_str(" \\end{itemize}");
    Some(latex)
}

/// Formats the SKILLS section, or `None` if there is no `Label: items` line.
pub fn format_skills(content: &str) -> Option<String> {
    render_skills(&parse_skills(content))
}

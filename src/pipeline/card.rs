use crate::models::{ArchiveLink, IntelRecord, RawSubmission};

/// Strip square brackets from a logic chain before it lands inside a
/// markdown link context, where they break the link syntax.
pub fn sanitize_logic_chain(logic_chain: &str) -> String {
    logic_chain.replace(['[', ']'], "")
}

/// Render one record's analysis card for the vault.
pub fn render_card(record: &IntelRecord) -> String {
    let mut card = String::new();

    card.push_str(&format!("# {}\n\n", record.title));
    card.push_str(&format!("- 分类: {}\n", record.category.as_str()));
    card.push_str(&format!("- 偏向: {}\n", record.bias.as_str()));
    card.push_str(&format!("- 日期: {}\n", record.date.format("%Y-%m-%d")));
    card.push_str(&format!("- 原文日期: {}\n", record.publication_date));
    if !record.tags.is_empty() {
        let tags: Vec<String> = record.tags.iter().map(|t| format!("`{t}`")).collect();
        card.push_str(&format!("- 标签: {}\n", tags.join(" ")));
    }
    match &record.raw_doc_link {
        ArchiveLink::Url(_) => {
            card.push_str(&format!("- 原始档案: [查看原文]({})\n", record.raw_doc_link.href()));
        }
        ArchiveLink::Failed => card.push_str("- 原始档案: 归档失败\n"),
        ArchiveLink::Pending => card.push_str("- 原始档案: 未归档\n"),
    }

    if !record.logic_chain.is_empty() {
        card.push_str(&format!(
            "\n## 逻辑链\n\n{}\n",
            sanitize_logic_chain(&record.logic_chain)
        ));
    }

    card.push_str(&format!("\n## 摘要\n\n{}\n", record.summary));

    let analysis = &record.deep_analysis;
    if !analysis.is_empty() {
        card.push_str("\n## 深度分析\n");
        for (heading, body) in [
            ("事实 (Facts)", &analysis.facts),
            ("观点 (Opinions)", &analysis.opinions),
            ("逻辑 (Logic)", &analysis.logic),
            ("假设 (Assumptions)", &analysis.assumptions),
        ] {
            if !body.is_empty() {
                card.push_str(&format!("\n### {heading}\n\n{body}\n"));
            }
        }
    }

    card
}

/// Render the inbound raw submission for the vault, verbatim text plus
/// provenance header.
pub fn render_raw_document(title: &str, submission: &RawSubmission) -> String {
    let mut doc = format!("# {title}\n\n");
    doc.push_str(&format!(
        "> 收录时间: {}\n",
        submission.received_at.format("%Y-%m-%d %H:%M:%S")
    ));
    if let Some(source) = &submission.source_url {
        doc.push_str(&format!("> 来源: {source}\n"));
    }
    doc.push('\n');
    doc.push_str(&submission.text);
    doc.push('\n');
    doc
}

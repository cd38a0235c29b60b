/// Build the decomposition prompt for one inbound text.
///
/// One instruction, one strict output shape: a JSON array of intel items.
/// The model may legally return a single object for single-item input; the
/// parser coerces it. Storage links and dispatch stamps are deliberately
/// absent from the shape; they belong to the dispatcher.
pub fn build_dispatch_prompt(raw_text: &str) -> String {
    format!(
        r#"你是一家宏观对冲基金的情报分析师。请将下面的原始文本拆解为一条或多条独立的情报条目。
同一文本若包含多个互不相关的结论，必须拆成多条；不要合并。

<原文>
{raw_text}
</原文>

对每条情报输出一个 JSON 对象，所有条目组成一个 JSON 数组。不要输出数组以外的任何文字。
字段要求：

```json
[
  {{
    "category": "MACRO 或 RADAR（宏观/经济整体 = MACRO，单一标的/个股 = RADAR）",
    "title": "极简结论，不超过 20 个字",
    "summary": "一句话复述核心内容",
    "bias": "Bullish | Bearish | Neutral",
    "tags": ["#标签1", "#标签2"],
    "logic_chain": "因 -> 果 -> 交易含义",
    "publication_date": "原文提及的日期，格式 YYYY-MM-DD，没有则写 Unknown",
    "deep_analysis": {{
      "facts": "原文中的客观事实",
      "opinions": "原文中的观点与判断",
      "logic": "推理链条",
      "assumptions": "隐含假设与风险点"
    }}
  }}
]
```

要求：逻辑深邃，避开平庸观点，寻找市场共识之外的偏差。输出必须是合法 JSON。"#
    )
}

use super::decompose::LlmClient;
use super::dispatcher::{DispatchedRecord, Dispatcher, DispatchError};

/// Macro-paradigm research dimensions used to generate synthetic intel.
pub const MACRO_PARADIGM_QUESTIONS: &[&str] = &[
    "当前宏观范式正在从什么向什么转变？我们处于什么经济周期？",
    "当前市场比较超越预期的是什么？主要矛盾和张力最大的部分在哪里？",
    "当下供需关系严重错配的地方是什么？美股市场的主题主线及行业逻辑是什么？",
    "当下最现象级的事件/产品/公司是什么？资金轮动路径及流动性走向如何？",
];

/// Outcome of one factory question: the question, and what dispatching the
/// generated answer produced.
#[derive(Debug)]
pub struct FactoryRun {
    pub question: String,
    pub outcome: Result<Vec<DispatchedRecord>, DispatchError>,
}

/// Generates synthetic intel: runs research questions through the model and
/// feeds each answer to the dispatcher like any other inbound text.
pub struct IntelFactory {
    llm: Box<dyn LlmClient + Send + Sync>,
    model: String,
}

impl IntelFactory {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, model: &str) -> Self {
        Self {
            llm,
            model: model.to_string(),
        }
    }

    /// Run a batch of questions. A generation failure for one question does
    /// not stop the batch; it is recorded in that question's outcome.
    pub fn run(
        &self,
        dispatcher: &Dispatcher,
        questions: &[&str],
        source_tag: &str,
    ) -> Vec<FactoryRun> {
        questions
            .iter()
            .map(|question| {
                tracing::info!(question, "Factory generating");
                let outcome = self
                    .llm
                    .generate(&self.model, &build_research_prompt(question))
                    .map_err(DispatchError::from)
                    .and_then(|answer| {
                        // Tag the generated text so downstream filtering can
                        // tell synthetic intel from inbound intel
                        let injected = format!("【来源: {source_tag}】\n\n{answer}");
                        dispatcher.dispatch(&injected, source_tag)
                    });
                if let Err(e) = &outcome {
                    tracing::warn!(question, error = %e, "Factory run failed");
                }
                FactoryRun {
                    question: question.to_string(),
                    outcome,
                }
            })
            .collect()
    }
}

fn build_research_prompt(question: &str) -> String {
    format!(
        "你是一个宏观对冲基金的首席策略师。请针对以下问题进行深度思考并给出研报：{question}。\
         要求：逻辑深邃，避开平庸观点，寻找市场共识之外的偏差。"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::pipeline::decompose::{Decomposer, MockLlmClient};
    use crate::vault::MockVault;

    fn dispatcher() -> Dispatcher {
        let response = r#"[{
            "category": "MACRO",
            "title": "流动性范式切换",
            "summary": "从紧缩转向宽松",
            "bias": "Bullish",
            "tags": ["#Macro"],
            "logic_chain": "宽松 -> 风险资产重估",
            "publication_date": "Unknown",
            "deep_analysis": {"facts": "", "opinions": "", "logic": "", "assumptions": ""}
        }]"#;
        Dispatcher::new(
            Decomposer::new(Box::new(MockLlmClient::new(response))),
            Box::new(MockVault::new()),
            open_memory_database().unwrap(),
        )
    }

    #[test]
    fn factory_dispatches_every_question() {
        let factory = IntelFactory::new(
            Box::new(MockLlmClient::new("合成研报正文")),
            "gemini-2.0-flash",
        );
        let runs = factory.run(&dispatcher(), MACRO_PARADIGM_QUESTIONS, "Macro_Paradigm");

        assert_eq!(runs.len(), MACRO_PARADIGM_QUESTIONS.len());
        for run in &runs {
            let records = run.outcome.as_ref().unwrap();
            assert_eq!(records.len(), 1);
            assert!(records[0].is_persisted());
        }
    }

    #[test]
    fn generation_failure_recorded_not_fatal() {
        let factory = IntelFactory::new(Box::new(MockLlmClient::unreachable()), "deepseek-chat");
        let runs = factory.run(&dispatcher(), &["q1", "q2"], "Macro_Paradigm");

        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|r| r.outcome.is_err()));
    }

    #[test]
    fn research_prompt_embeds_question() {
        let prompt = build_research_prompt("当前周期处于何处？");
        assert!(prompt.contains("当前周期处于何处？"));
        assert!(prompt.contains("首席策略师"));
    }
}

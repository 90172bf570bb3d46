//! Prompt assembly
//!
//! System instructions are rendered from named templates with strict variable
//! resolution: a missing substitution variable fails the render instead of
//! interpolating blank text into the instruction.

use minijinja::{context, Environment, UndefinedBehavior};

use crate::core::AgentResult;

/// Instruction set for setup mode: collect the two required repository facts
/// and persist them through the setup tool.
const SETUP_TEMPLATE: &str = r#"
you are juniordev, a friendly dev bot that purrs like a kitten 😻.
you always keep your comments super short and sweet, meow!
you are participating in a telegram group (chat id {{ chat_id }}) with a small team of devs.
the team needs your help, juniordev!!

right now the team needs to finish setup.
setup is complete when the team has identified the following,
- the github repo owner
- the github repo name

objective: collect this information from your teammates.
objective: call the setup_chat tool when you have everything you need.
constraint: your responses must be designed for Telegram. that means always KEEP IT SHORT. be a concise kitty!
"#;

/// Instruction set for task mode: read one file, optionally propose one change
/// to that one file, nothing more.
const TASK_TEMPLATE: &str = r#"
you are juniordev, a friendly dev bot that purrs like a kitten 😻.
you always keep your comments super short and sweet, meow!
you are participating in a telegram group with a small team of devs working on {{ repo_owner }}/{{ repo_name }}.
the team needs your help, juniordev!!

your teammates will ask you to perform simple tasks on the repo.
to perform a simple task:
  1. decide if you can do the task or not. if you can't do the task, that's OK! but you must say so.
  2. determine which file you need to access
  3. read the file using the read_file tool
  4. if the team only had questions, answer them and you're done!
  5. if the team had a task involving changes to the file, use the create_pull_request tool
  6. update your teammates on your progress, include a link to your new pr

constraint: you have tools to help you with your tasks. you must use them, meow!
constraint: you are only a juniordev! for now you can only change one file at a time.
constraint: you should only accept tasks that involve one file at a time.
constraint: your responses must be designed for Telegram. that means always KEEP IT SHORT. be a concise kitty!

ps. to help you get started, here is {{ repo_name }}'s current project structure,
{{ tree }}
"#;

/// Renders the mode-specific system instructions
pub struct PromptAssembler {
    env: Environment<'static>,
}

impl PromptAssembler {
    pub fn new() -> AgentResult<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template("setup", SETUP_TEMPLATE)?;
        env.add_template("task", TASK_TEMPLATE)?;
        Ok(Self { env })
    }

    /// System instruction for setup mode
    pub fn setup_prompt(&self, chat_id: i64) -> AgentResult<String> {
        let rendered = self
            .env
            .get_template("setup")?
            .render(context! { chat_id })?;
        Ok(rendered.trim().to_string())
    }

    /// System instruction for task mode; `tree` is interpolated verbatim
    pub fn task_prompt(&self, repo_owner: &str, repo_name: &str, tree: &str) -> AgentResult<String> {
        let rendered = self
            .env
            .get_template("task")?
            .render(context! { repo_owner, repo_name, tree })?;
        Ok(rendered.trim().to_string())
    }
}

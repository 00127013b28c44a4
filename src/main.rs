use anyhow::{bail, Context as _};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use prompt_wizard::config::{self, EffectiveSettings, Overrides};
use prompt_wizard::render::{self as render_mod, TokenReport};
use prompt_wizard::tasks::{self, TaskList};
use prompt_wizard::template::{self, TemplateData};
use prompt_wizard::wizard::{AnswerField, CodeGenPromptType, WizardState, WizardStep};
use prompt_wizard::{io, llm, store};

#[derive(Parser, Debug, Clone)]
#[command(name = "pw", version, about = "Step-by-step AI prompt wizard", long_about = None)]
struct Cli {
    /// Model override for AI calls
    #[arg(short = 'm', long = "model", global = true)]
    model: Option<String>,

    /// Directory containing the prompt templates
    #[arg(long = "templates-dir", global = true)]
    templates_dir: Option<PathBuf>,

    /// Output JSON instead of human-readable text
    #[arg(long = "json", global = true)]
    json: bool,

    /// Disable ANSI colors
    #[arg(long = "no-color", global = true)]
    no_color: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Timeout (seconds) for network requests
    #[arg(long = "timeout", global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Write the configuration file
    Init(InitArgs),

    /// Count the model tokens of some text
    Tokens(TokensArgs),

    /// Render a step's prompt with the saved answers filled in
    Render(RenderArgs),

    /// List the placeholders a template uses
    Placeholders(PlaceholdersArgs),

    /// Check off tasks in an implementation plan
    Tasks {
        #[command(subcommand)]
        command: TasksCommands,
    },

    /// Inspect or edit saved answers
    State {
        #[command(subcommand)]
        command: StateCommands,
    },

    /// Move between wizard steps
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },

    /// Tidy up the saved idea with an AI model
    CleanIdea(CleanIdeaArgs),
}

#[derive(Args, Debug, Clone)]
struct InitArgs {
    /// Directory containing prompt1.md .. prompt5.md
    #[arg(long = "templates")]
    templates: Option<PathBuf>,
    /// Provider name (openai, mock)
    #[arg(long)]
    provider: Option<String>,
    /// API key value
    #[arg(long = "api-key")]
    api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API
    #[arg(long = "api-base")]
    api_base: Option<String>,
    /// Default model
    #[arg(long = "default-model")]
    default_model: Option<String>,
    /// Token count above which prompts are flagged
    #[arg(long = "token-threshold")]
    token_threshold: Option<usize>,
    /// URL or path of the default project rules
    #[arg(long = "project-rules-default", value_name = "URL")]
    project_rules_default: Option<String>,
    /// URL or path of the default starter template
    #[arg(long = "starter-template-default", value_name = "URL")]
    starter_template_default: Option<String>,
    /// Validate credentials now
    #[arg(long)]
    validate: bool,
}

#[derive(Args, Debug, Clone)]
struct TokensArgs {
    /// Text to count (reads stdin when neither text nor --file is given)
    #[arg(value_name = "TEXT...")]
    text: Vec<String>,
    /// Count the contents of a file
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct TemplateSource {
    /// Wizard step whose template to use (default: current step)
    #[arg(long, conflicts_with = "template")]
    step: Option<String>,
    /// Template file to use instead of a step template
    #[arg(long)]
    template: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct RenderArgs {
    #[command(flatten)]
    source: TemplateSource,
    /// Extra or overriding values, KEY=VALUE
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
    /// Write the prompt to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct PlaceholdersArgs {
    #[command(flatten)]
    source: TemplateSource,
}

#[derive(Subcommand, Debug, Clone)]
enum TasksCommands {
    /// List checkbox tasks
    List {
        /// Read tasks from a file (default: saved implementation plan)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Flip tasks by index and write the plan back
    Toggle(TaskEditArgs),
    /// Mark tasks done
    Check(TaskEditArgs),
    /// Mark tasks not done
    Uncheck(TaskEditArgs),
}

#[derive(Args, Debug, Clone)]
struct TaskEditArgs {
    /// Task index (repeatable)
    #[arg(long = "index", required = true)]
    index: Vec<usize>,
    /// Edit a file (default: saved implementation plan)
    #[arg(long)]
    file: Option<PathBuf>,
    /// Print the result without writing it
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy)]
enum TaskEdit {
    Toggle,
    Set(bool),
}

#[derive(Subcommand, Debug, Clone)]
enum StateCommands {
    /// Summarize all saved answers
    Show,
    /// Print one saved answer
    Get {
        field: String,
    },
    /// Save an answer (from VALUE, --file, or stdin)
    Set {
        field: String,
        value: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Replace projectRules or starterTemplate with its configured default
    LoadDefault {
        field: String,
    },
    /// Choose the code generation prompt variant (standard, advanced)
    CodegenType {
        kind: String,
    },
    /// Delete all saved answers
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
enum StepCommands {
    /// Show the current step
    Show,
    /// Go to the next step
    Next,
    /// Go to the previous step
    Prev,
    /// Jump to a step
    Goto {
        step: String,
    },
}

#[derive(Args, Debug, Clone)]
struct CleanIdeaArgs {
    /// Provider to use (openai, mock)
    #[arg(long)]
    provider: Option<String>,
    /// Replace the saved idea with the cleaned text
    #[arg(long)]
    apply: bool,
}

#[derive(Debug, Clone)]
struct GlobalOpts {
    model: Option<String>,
    templates_dir: Option<PathBuf>,
    json: bool,
    timeout_secs: Option<u64>,
}

impl GlobalOpts {
    fn settings(&self, provider: Option<&str>) -> anyhow::Result<EffectiveSettings> {
        config::resolve_effective_settings(&Overrides {
            templates_dir: self.templates_dir.clone(),
            provider: provider.map(|s| s.to_string()),
            model: self.model.clone(),
        })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(60))
    }
}

fn init_tracing(verbose: u8, no_color: bool) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("warn,prompt_wizard={level},pw={level}")));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false);

    tracing_subscriber::registry().with(env_filter).with(stderr_layer).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Cli {
        model,
        templates_dir,
        json,
        no_color,
        verbose,
        timeout_secs,
        command,
    } = cli;

    init_tracing(verbose, no_color);

    let globals = GlobalOpts {
        model,
        templates_dir,
        json,
        timeout_secs,
    };

    let result = match command {
        Commands::Init(args) => cmd_init(&globals, args).await,
        Commands::Tokens(args) => cmd_tokens(&globals, args).await,
        Commands::Render(args) => cmd_render(&globals, args).await,
        Commands::Placeholders(args) => cmd_placeholders(&globals, args).await,
        Commands::Tasks { command } => cmd_tasks(&globals, command).await,
        Commands::State { command } => cmd_state(&globals, command).await,
        Commands::Step { command } => cmd_step(&globals, command).await,
        Commands::CleanIdea(args) => cmd_clean_idea(&globals, args).await,
    };

    if let Err(e) = result {
        tracing::debug!("command failed: {e:?}");
        if globals.json {
            let (code, hint) = classify_error(&e);
            let msg = format!("{:#}", e);
            render_mod::print_json_error(code, &msg, hint);
        } else {
            eprintln!("error: {:#}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

fn classify_error(e: &anyhow::Error) -> (&'static str, Option<&'static str>) {
    let msg = format!("{:#}", e).to_lowercase();
    if msg.contains("file not found") {
        return ("file_not_found", Some("check the file path or --templates-dir"));
    }
    if msg.contains("stale task list") {
        return ("stale_tasks", Some("re-read the plan and try again"));
    }
    if msg.contains("approval required") {
        return ("approval_required", Some("re-run with --yes to approve"));
    }
    if msg.contains("openai_api_key") {
        return ("missing_api_key", Some("set OPENAI_API_KEY in env or .env"));
    }
    if msg.contains("unsupported provider") {
        return ("provider_unsupported", None);
    }
    if msg.contains("empty idea") || msg.contains("no tasks found") || msg.contains("no default configured") {
        return ("missing_input", None);
    }
    if msg.contains("failed to parse") {
        return ("parse_error", None);
    }
    if msg.contains("failed to fetch") {
        return ("network_error", Some("check the configured default URL"));
    }
    if msg.contains("invalid ") {
        return ("invalid_args", None);
    }
    if msg.contains("timed out") || msg.contains("timeout") {
        return ("timeout", Some("try increasing --timeout or check network"));
    }
    if msg.contains("network") || msg.contains("dns") || msg.contains("connection refused") {
        return ("network_error", None);
    }
    ("unknown", None)
}

async fn cmd_init(globals: &GlobalOpts, args: InitArgs) -> anyhow::Result<()> {
    use config::{default_config_path, load_config_if_exists, write_config};

    let path = default_config_path()?;
    let mut cfg = load_config_if_exists(&path)?.unwrap_or_default();

    if let Some(dir) = args.templates { cfg.templates_dir = Some(dir); }
    if let Some(p) = args.provider { cfg.provider = Some(p); }
    if let Some(k) = args.api_key { cfg.api_key = Some(k); }
    if let Some(b) = args.api_base { cfg.api_base = Some(b); }
    if let Some(m) = args.default_model { cfg.model = Some(m); }
    if let Some(t) = args.token_threshold { cfg.token_threshold = Some(t); }
    if let Some(u) = args.project_rules_default { cfg.project_rules_default_url = Some(u); }
    if let Some(u) = args.starter_template_default { cfg.starter_template_default_url = Some(u); }

    if args.validate {
        dotenvy::dotenv().ok();
        let env_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let eff = config::merge_settings(cfg.clone(), &Overrides::default(), env_key);
        llm::validate_provider_credentials(&eff, Duration::from_secs(globals.timeout_secs.unwrap_or(10))).await?;
    }

    write_config(&path, &cfg)?;
    tracing::info!(path = %path.display(), "config written");
    if globals.json {
        #[derive(serde::Serialize)]
        struct Out { path: String }
        render_mod::print_json(&Out { path: path.display().to_string() });
    } else {
        println!("config written: {}", path.display());
    }
    Ok(())
}

async fn cmd_tokens(globals: &GlobalOpts, args: TokensArgs) -> anyhow::Result<()> {
    let text = if let Some(file) = &args.file {
        io::read_file_to_string_async(file).await?
    } else if !args.text.is_empty() {
        args.text.join(" ")
    } else {
        io::read_stdin_to_string_async().await?
    };
    let settings = globals.settings(None)?;
    let report = TokenReport::for_text(&text, settings.token_threshold);
    if globals.json {
        render_mod::print_json(&report);
    } else {
        println!("{}", report.line());
    }
    Ok(())
}

/// Template text and a display name, from `--template` or a wizard step.
async fn resolve_template(
    settings: &EffectiveSettings,
    state: &WizardState,
    source: &TemplateSource,
) -> anyhow::Result<io::PromptTemplate> {
    if let Some(path) = &source.template {
        let content = io::read_file_to_string_async(path).await?;
        return Ok(io::PromptTemplate { file_name: path.display().to_string(), content });
    }
    let step = match &source.step {
        Some(s) => s.parse::<WizardStep>()?,
        None => state.current_step,
    };
    io::load_step_template(&settings.templates_dir, state, step).await
}

async fn cmd_render(globals: &GlobalOpts, args: RenderArgs) -> anyhow::Result<()> {
    let settings = globals.settings(None)?;
    let state = store::load_state()?;
    let tmpl = resolve_template(&settings, &state, &args.source).await?;

    let mut data: TemplateData = state.template_data()?;
    data.apply_assignments(&args.set)?;

    let prompt = template::substitute(&tmpl.content, &data);
    let unresolved = template::unresolved(&tmpl.content, &data);
    let report = TokenReport::for_text(&prompt, settings.token_threshold);
    tracing::info!(template = %tmpl.file_name, tokens = report.tokens, "prompt rendered");

    if let Some(out) = &args.output {
        io::write_file_async(out, &prompt).await?;
    }

    if globals.json {
        #[derive(serde::Serialize)]
        struct Out<'a> {
            template: &'a str,
            prompt: &'a str,
            tokens: &'a TokenReport,
            unresolved: &'a [String],
            #[serde(skip_serializing_if = "Option::is_none")]
            output: Option<String>,
        }
        render_mod::print_json(&Out {
            template: &tmpl.file_name,
            prompt: &prompt,
            tokens: &report,
            unresolved: &unresolved,
            output: args.output.as_ref().map(|p| p.display().to_string()),
        });
        return Ok(());
    }

    match &args.output {
        Some(out) => println!("prompt written: {}", out.display()),
        None => println!("{}", prompt),
    }
    eprintln!("{}", report.line());
    if !unresolved.is_empty() {
        eprintln!("unresolved placeholders: {}", unresolved.join(", "));
    }
    Ok(())
}

async fn cmd_placeholders(globals: &GlobalOpts, args: PlaceholdersArgs) -> anyhow::Result<()> {
    let settings = globals.settings(None)?;
    let state = store::load_state()?;
    let tmpl = resolve_template(&settings, &state, &args.source).await?;
    let data = state.template_data()?;

    #[derive(serde::Serialize)]
    struct Entry { name: String, provided: bool, filled: bool }
    let entries: Vec<Entry> = template::placeholders(&tmpl.content)
        .into_iter()
        .map(|name| {
            let provided = data.contains(&name);
            let filled = data.get(&name).is_some_and(|v| !v.trim().is_empty());
            Entry { name, provided, filled }
        })
        .collect();

    if globals.json {
        render_mod::print_json(&entries);
    } else if entries.is_empty() {
        println!("(no placeholders in {})", tmpl.file_name);
    } else {
        for e in entries {
            let status = match (e.provided, e.filled) {
                (false, _) => "unknown",
                (true, false) => "empty",
                (true, true) => "filled",
            };
            println!("{}\t{}", e.name, status);
        }
    }
    Ok(())
}

async fn cmd_tasks(globals: &GlobalOpts, cmd: TasksCommands) -> anyhow::Result<()> {
    let (edit, args) = match cmd {
        TasksCommands::List { file } => {
            let source = match &file {
                Some(path) => io::read_file_to_string_async(path).await?,
                None => store::load_state()?.planner_prompt_output,
            };
            let list = TaskList::parse(&source);
            if globals.json {
                render_mod::print_json(&list.tasks());
            } else {
                render_mod::render_task_list(&list);
            }
            return Ok(());
        }
        TasksCommands::Toggle(args) => (TaskEdit::Toggle, args),
        TasksCommands::Check(args) => (TaskEdit::Set(true), args),
        TasksCommands::Uncheck(args) => (TaskEdit::Set(false), args),
    };
    edit_tasks(globals, edit, args).await
}

async fn edit_tasks(globals: &GlobalOpts, edit: TaskEdit, args: TaskEditArgs) -> anyhow::Result<()> {
    let TaskEditArgs { index, file, dry_run } = args;
    let mut state = None;
    let source = match &file {
        Some(path) => io::read_file_to_string_async(path).await?,
        None => {
            let loaded = store::load_state()?;
            let text = loaded.planner_prompt_output.clone();
            state = Some(loaded);
            text
        }
    };

    let mut list = TaskList::parse(&source);
    if list.is_empty() {
        bail!("no tasks found; expected lines like \"- [ ] Task description\"");
    }
    for i in &index {
        let found = match edit {
            TaskEdit::Toggle => list.toggle(*i),
            TaskEdit::Set(checked) => list.set_checked(*i, checked),
        };
        if !found {
            bail!("invalid task index {}: {} task(s) found", i, list.len());
        }
    }
    let updated = list.apply(&source)?;

    let written = if dry_run {
        None
    } else if let Some(path) = &file {
        io::write_file_async(path, &updated).await?;
        Some(path.display().to_string())
    } else {
        let mut state = state.context("wizard state not loaded")?;
        state.set(AnswerField::PlannerPromptOutput, updated.clone());
        store::save_state(&state)?;
        Some(AnswerField::PlannerPromptOutput.to_string())
    };
    tracing::info!(edited = index.len(), ?edit, dry_run, "tasks updated");

    let after = TaskList::parse(&updated);
    if globals.json {
        #[derive(serde::Serialize)]
        struct Out<'a> { tasks: &'a [tasks::Task], written: Option<String> }
        render_mod::print_json(&Out { tasks: after.tasks(), written });
    } else if dry_run {
        print!("{}", updated);
        if !updated.ends_with('\n') { println!(); }
    } else {
        render_mod::render_task_list(&after);
        if let Some(target) = written { println!("updated: {}", target); }
    }
    Ok(())
}

async fn cmd_state(globals: &GlobalOpts, cmd: StateCommands) -> anyhow::Result<()> {
    match cmd {
        StateCommands::Show => {
            let state = store::load_state()?;
            if globals.json {
                render_mod::print_json(&state);
                return Ok(());
            }
            println!("step: {} ({}/{})", state.current_step, state.current_step.position() + 1, WizardStep::ALL.len());
            println!("codegen prompt: {:?}", state.code_gen_prompt_type);
            for field in AnswerField::ALL {
                let value = state.get(field);
                if value.is_empty() {
                    println!("{:<22} (empty)", field.as_str());
                } else {
                    let preview: String = value.lines().next().unwrap_or("").chars().take(50).collect();
                    println!("{:<22} {} chars, {} tokens: {}", field.as_str(), value.chars().count(), prompt_wizard::tokens::count(value), preview);
                }
            }
        }
        StateCommands::Get { field } => {
            let field: AnswerField = field.parse()?;
            let state = store::load_state()?;
            if globals.json {
                #[derive(serde::Serialize)]
                struct Out<'a> { field: &'a str, value: &'a str }
                render_mod::print_json(&Out { field: field.as_str(), value: state.get(field) });
            } else {
                println!("{}", state.get(field));
            }
        }
        StateCommands::Set { field, value, file } => {
            let field: AnswerField = field.parse()?;
            let value = match (value, file) {
                (Some(_), Some(_)) => bail!("invalid arguments: give either VALUE or --file, not both"),
                (Some(v), None) => v,
                (None, Some(path)) => io::read_file_to_string_async(&path).await?,
                (None, None) => io::read_stdin_to_string_async().await?,
            };
            let mut state = store::load_state()?;
            state.set(field, value);
            let path = store::save_state(&state)?;
            tracing::info!(field = %field, path = %path.display(), "answer saved");
            if globals.json {
                #[derive(serde::Serialize)]
                struct Out<'a> { field: &'a str, chars: usize }
                render_mod::print_json(&Out { field: field.as_str(), chars: state.get(field).chars().count() });
            } else {
                println!("saved {}", field);
            }
        }
        StateCommands::LoadDefault { field } => {
            let field: AnswerField = field.parse()?;
            let settings = globals.settings(None)?;
            let mut state = store::load_state()?;
            load_default_into(&mut state, &settings, field, globals.timeout()).await?;
            store::save_state(&state)?;
            tracing::info!(field = %field, "default loaded");
            if globals.json {
                #[derive(serde::Serialize)]
                struct Out<'a> { field: &'a str, chars: usize }
                render_mod::print_json(&Out { field: field.as_str(), chars: state.get(field).chars().count() });
            } else {
                println!("loaded default {}", field);
            }
        }
        StateCommands::CodegenType { kind } => {
            let kind: CodeGenPromptType = kind.parse()?;
            let mut state = store::load_state()?;
            state.code_gen_prompt_type = kind;
            store::save_state(&state)?;
            if globals.json {
                #[derive(serde::Serialize)]
                #[serde(rename_all = "camelCase")]
                struct Out { code_gen_prompt_type: CodeGenPromptType, template: Option<&'static str> }
                render_mod::print_json(&Out {
                    code_gen_prompt_type: kind,
                    template: state.template_file_for(WizardStep::CodeGenPrompt),
                });
            } else {
                println!("codegen prompt: {:?}", kind);
            }
        }
        StateCommands::Reset { yes } => {
            if !yes {
                bail!("approval required: resetting deletes all saved answers");
            }
            let removed = store::reset_state()?;
            if globals.json {
                #[derive(serde::Serialize)]
                struct Out { removed: bool }
                render_mod::print_json(&Out { removed });
            } else if removed {
                println!("all data has been reset");
            } else {
                println!("nothing to reset");
            }
        }
    }
    Ok(())
}

/// Fetch the configured default for `field` and store it in `state`.
async fn load_default_into(
    state: &mut WizardState,
    settings: &EffectiveSettings,
    field: AnswerField,
    timeout: Duration,
) -> anyhow::Result<()> {
    if !matches!(field, AnswerField::ProjectRules | AnswerField::StarterTemplate) {
        bail!("invalid field '{}' for load-default: expected projectRules or starterTemplate", field);
    }
    let Some(source) = settings.default_source(field) else {
        bail!("no default configured for {}; set one with `pw init`", field);
    };
    let text = io::fetch_default_text(source, timeout).await?;
    state.set(field, text);
    Ok(())
}

async fn cmd_step(globals: &GlobalOpts, cmd: StepCommands) -> anyhow::Result<()> {
    let mut state = store::load_state()?;
    let changed = match cmd {
        StepCommands::Show => false,
        StepCommands::Next => {
            if state.current_step.is_last() && !globals.json {
                eprintln!("already at the last step");
            }
            state.next_step();
            true
        }
        StepCommands::Prev => {
            if state.current_step.is_first() && !globals.json {
                eprintln!("already at the first step");
            }
            state.previous_step();
            true
        }
        StepCommands::Goto { step } => {
            state.go_to(step.parse()?);
            true
        }
    };
    if changed {
        // An empty rules or starter step picks up its configured default.
        let field = state.current_step.answer_field().filter(|f| {
            matches!(f, AnswerField::ProjectRules | AnswerField::StarterTemplate) && state.get(*f).is_empty()
        });
        if let Some(field) = field {
            let settings = globals.settings(None)?;
            if settings.default_source(field).is_some() {
                if let Err(e) = load_default_into(&mut state, &settings, field, globals.timeout()).await {
                    tracing::warn!("could not load default {}: {:#}", field, e);
                }
            }
        }
        store::save_state(&state)?;
    }

    let step = state.current_step;
    let template = state.template_file_for(step);
    let field = step.answer_field();
    if globals.json {
        #[derive(serde::Serialize)]
        struct Out<'a> {
            step: WizardStep,
            title: &'a str,
            position: usize,
            total: usize,
            template: Option<&'a str>,
            answer_field: Option<&'a str>,
            answered: bool,
        }
        render_mod::print_json(&Out {
            step,
            title: step.title(),
            position: step.position() + 1,
            total: WizardStep::ALL.len(),
            template,
            answer_field: field.map(|f| f.as_str()),
            answered: field.is_some_and(|f| !state.get(f).is_empty()),
        });
        return Ok(());
    }
    println!("step: {} ({}/{}) {}", step, step.position() + 1, WizardStep::ALL.len(), step.title());
    if let Some(t) = template {
        println!("template: {}", t);
    }
    if let Some(f) = field {
        let status = if state.get(f).is_empty() { "empty" } else { "filled" };
        println!("answer: {} ({})", f, status);
    }
    Ok(())
}

async fn cmd_clean_idea(globals: &GlobalOpts, args: CleanIdeaArgs) -> anyhow::Result<()> {
    let settings = globals.settings(args.provider.as_deref())?;
    let mut state = store::load_state()?;
    let adapter = llm::adapter_for(&settings, globals.timeout())?;
    let cleaned = llm::clean_idea(adapter.as_ref(), &settings.model, &state.idea).await?;

    if args.apply {
        state.idea = cleaned.clone();
        store::save_state(&state)?;
    }
    if globals.json {
        #[derive(serde::Serialize)]
        struct Out<'a> { model: &'a str, idea: &'a str, applied: bool }
        render_mod::print_json(&Out { model: &settings.model, idea: &cleaned, applied: args.apply });
    } else {
        println!("{}", cleaned);
    }
    Ok(())
}

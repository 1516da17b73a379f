use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use ideaplan::config::StoreBackend;
use ideaplan::models::Answers;
use ideaplan::{api, Config, Pipeline, PipelineError};

#[derive(Parser)]
#[command(name = "ideaplan")]
#[command(about = "Turn a short idea into questions, a dependency graph and an implementation plan")]
struct Cli {
    /// Artifact store to use (overrides IDEAPLAN_STORE)
    #[arg(long, global = true, value_enum)]
    store: Option<StoreBackend>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Store a new idea and print its id
    Ingest {
        /// Free-form idea text
        text: String,
    },
    /// Generate clarifying questions for an idea
    Questions { id: Uuid },
    /// Record answers as `question=answer` pairs
    Answer {
        id: Uuid,

        /// Repeatable; split on the first `=`
        #[arg(short, long = "answer", value_parser = parse_answer)]
        answers: Vec<(String, String)>,
    },
    /// Print the idea's graph, generating one if none is stored
    Graph {
        id: Uuid,

        /// Regenerate with the model even if a graph is stored
        #[arg(long, conflicts_with = "heuristic")]
        rebuild: bool,

        /// Build from the answers without calling the model
        #[arg(long)]
        heuristic: bool,
    },
    /// Rewrite the stored graph according to an instruction
    Edit { id: Uuid, instruction: String },
    /// Print the implementation plan, generating it if needed
    Plan { id: Uuid },
    /// Show the idea and how far it has progressed
    Status { id: Uuid },
}

fn parse_answer(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((question, answer)) if !question.trim().is_empty() => {
            Ok((question.trim().to_string(), answer.trim().to_string()))
        }
        _ => Err(format!("expected `question=answer`, got {:?}", raw)),
    }
}

/// Logs go to stderr so command output on stdout stays pipeable.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "ideaplan=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn serve(pipeline: Pipeline, config: &Config, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting ideaplan server on port {}", port);

    let app = api::create_router(pipeline, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("ideaplan server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run(command: Option<Commands>, pipeline: Pipeline, config: &Config) -> anyhow::Result<()> {
    match command {
        Some(Commands::Serve { port }) => serve(pipeline, config, port).await?,
        Some(Commands::Ingest { text }) => {
            let idea_id = pipeline.ingest(&text)?;
            println!("{}", idea_id);
        }
        Some(Commands::Questions { id }) => {
            for question in pipeline.generate_questions(id).await? {
                println!("{}", question);
            }
        }
        Some(Commands::Answer { id, answers }) => {
            let answers: Answers = answers.into_iter().collect();
            let idea = pipeline.submit_answers(id, answers)?;
            println!(
                "saved ({} of {} questions answered)",
                idea.answers.len(),
                idea.questions.len()
            );
        }
        Some(Commands::Graph { id, rebuild, heuristic }) => {
            let graph = if heuristic {
                pipeline.build_heuristic_graph(id)?
            } else if rebuild {
                pipeline.build_graph(id).await?
            } else {
                pipeline.load_or_build_graph(id).await?
            };
            print_json(&graph)?;
        }
        Some(Commands::Edit { id, instruction }) => {
            let graph = pipeline.edit_graph(id, &instruction).await?;
            print_json(&graph)?;
        }
        Some(Commands::Plan { id }) => {
            let plan = pipeline.get_plan(id).await?;
            println!("{}", plan.markdown);
        }
        Some(Commands::Status { id }) => {
            let status = pipeline.status(id)?;
            println!("stage: {}", status.stage);
            print_json(&status.idea)?;
        }
        None => serve(pipeline, config, 3000).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env();
    if let Some(backend) = cli.store {
        config.storage.backend = backend;
    }
    let pipeline = Pipeline::from_config(&config)?;

    if let Err(e) = run(cli.command, pipeline, &config).await {
        if let Some(PipelineError::GraphParse(err)) = e.downcast_ref::<PipelineError>() {
            eprintln!("Raw LLM response:\n{}", err.raw);
        }
        return Err(e);
    }
    Ok(())
}

use anyhow::Result;
use arc_client::{ArcClient, JobRequest, ListAgentsQuery, ListJobsQuery, Tags};
use clap::Subcommand;
use serde::Serialize;
use serde_json::json;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Registered agents, their facts and tags
    Agents {
        #[command(subcommand)]
        cmd: AgentCmd,
    },

    /// Remote jobs and their logs
    Jobs {
        #[command(subcommand)]
        cmd: JobCmd,
    },
}

#[derive(Subcommand, Debug)]
pub enum AgentCmd {
    /// List agents
    List {
        /// Filter expression, e.g. "@os = 'linux'"
        #[arg(long, default_value = "")]
        filter: String,
        /// Facts to include, comma separated
        #[arg(long, value_delimiter = ',')]
        facts: Vec<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 0)]
        per_page: u32,
    },

    /// Show one agent
    Show {
        agent_id: String,
        #[arg(long, value_delimiter = ',')]
        facts: Vec<String>,
    },

    /// Show all facts of an agent
    Facts { agent_id: String },

    /// Delete an agent
    Delete { agent_id: String },

    /// Show the tags of an agent
    Tags { agent_id: String },

    /// Add tags to an agent
    Tag {
        agent_id: String,
        /// KEY=VALUE pairs
        #[arg(required = true, value_parser = parse_tag)]
        tags: Vec<(String, String)>,
    },

    /// Remove one tag from an agent
    Untag { agent_id: String, key: String },
}

#[derive(Subcommand, Debug)]
pub enum JobCmd {
    /// List jobs
    List {
        /// Only jobs sent to this agent
        #[arg(long, default_value = "")]
        agent_id: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 0)]
        per_page: u32,
    },

    /// Show one job
    Show { job_id: String },

    /// Print whether a job is running, completed or failed
    Status { job_id: String },

    /// Print the log of a job
    Log { job_id: String },

    /// Execute a job on an agent
    Execute {
        /// Target agent id
        #[arg(long)]
        to: String,
        /// Agent module, e.g. execute or rpc
        #[arg(long)]
        agent: String,
        #[arg(long)]
        action: String,
        #[arg(long, default_value = "")]
        payload: String,
        /// Seconds the agent may spend on the job
        #[arg(long, default_value_t = 60)]
        timeout: u64,
    },
}

fn parse_tag(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(client: &ArcClient, token: &str, cmd: Command) -> Result<()> {
    match cmd {
        Command::Agents { cmd } => run_agents(client, token, cmd).await,
        Command::Jobs { cmd } => run_jobs(client, token, cmd).await,
    }
}

async fn run_agents(client: &ArcClient, token: &str, cmd: AgentCmd) -> Result<()> {
    match cmd {
        AgentCmd::List {
            filter,
            facts,
            page,
            per_page,
        } => {
            let query = ListAgentsQuery::new()
                .filter(filter)
                .show_facts(facts)
                .page(page)
                .per_page(per_page);
            print_json(&client.try_list_agents(token, &query).await?)
        }
        AgentCmd::Show { agent_id, facts } => {
            print_json(&client.try_find_agent(token, &agent_id, &facts).await?)
        }
        AgentCmd::Facts { agent_id } => {
            print_json(&client.try_show_agent_facts(token, &agent_id).await?)
        }
        AgentCmd::Delete { agent_id } => {
            let deleted = client.try_delete_agent(token, &agent_id).await?;
            print_json(&json!({ "agent_id": agent_id, "deleted": deleted }))
        }
        AgentCmd::Tags { agent_id } => {
            print_json(&client.try_show_agent_tags(token, &agent_id).await?)
        }
        AgentCmd::Tag { agent_id, tags } => {
            let tags: Tags = tags.into_iter().collect();
            client.try_add_agent_tags(token, &agent_id, &tags).await?;
            print_json(&json!({ "agent_id": agent_id, "added": tags }))
        }
        AgentCmd::Untag { agent_id, key } => {
            client.try_delete_agent_tag(token, &agent_id, &key).await?;
            print_json(&json!({ "agent_id": agent_id, "removed": key }))
        }
    }
}

async fn run_jobs(client: &ArcClient, token: &str, cmd: JobCmd) -> Result<()> {
    match cmd {
        JobCmd::List {
            agent_id,
            page,
            per_page,
        } => {
            let query = ListJobsQuery::new()
                .agent_id(agent_id)
                .page(page)
                .per_page(per_page);
            print_json(&client.try_list_jobs(token, &query).await?)
        }
        JobCmd::Show { job_id } => print_json(&client.try_find_job(token, &job_id).await?),
        JobCmd::Status { job_id } => {
            let job = client.try_find_job(token, &job_id).await?;
            print_json(&json!({
                "request_id": job_id,
                "status": job.status,
                "state": job.state(),
            }))
        }
        JobCmd::Log { job_id } => {
            print!("{}", client.try_find_job_log(token, &job_id).await?);
            Ok(())
        }
        JobCmd::Execute {
            to,
            agent,
            action,
            payload,
            timeout,
        } => {
            let request = JobRequest::new(to, agent, action)
                .timeout(timeout)
                .payload(payload);
            let request_id = client.try_execute_job(token, &request).await?;
            print_json(&json!({ "request_id": request_id }))
        }
    }
}

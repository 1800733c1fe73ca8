//! 命令行入口：迁移、模板管理和模板授权查询

use crate::config::AppConfig;
use crate::db::repositories::{
    GroupRepository, NewPermissionTemplate, PermissionTemplateRepository, UserRepository,
};
use crate::logging;
use crate::permission::{
    GroupWithPermission, Membership, UserWithPermission, WithPermissionQuery, DEFAULT_PAGE_SIZE,
};
use crate::storage::{init_storage, Storage};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Parser, Debug)]
#[command(
    name = "permtemplate",
    version,
    about = "Manage permission templates and inspect the groups and users they grant"
)]
pub struct Cli {
    /// Configuration file (defaults to ~/.permtemplate/config.json)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQLite database file, overrides the configured path
    #[arg(long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Manage permission templates
    #[command(subcommand)]
    Template(TemplateCommand),
    /// Manage groups
    #[command(subcommand)]
    Group(GroupCommand),
    /// Manage users
    #[command(subcommand)]
    User(UserCommand),
    /// Grant a template permission to a group (or Anyone)
    GrantGroup(GroupPermissionArgs),
    /// Revoke a template permission from a group (or Anyone)
    RevokeGroup(GroupPermissionArgs),
    /// Grant a template permission to a user
    GrantUser(UserPermissionArgs),
    /// Revoke a template permission from a user
    RevokeUser(UserPermissionArgs),
    /// List groups of a template with their permission marker
    Groups(LookupArgs),
    /// List active users of a template with their permission marker
    Users(LookupArgs),
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Regular expression matched against project keys
        #[arg(long)]
        key_pattern: Option<String>,
    },
    List,
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    Create { login: String, name: String },
    Deactivate { login: String },
}

#[derive(Args, Debug)]
pub struct GroupPermissionArgs {
    #[arg(long)]
    pub template: i64,
    /// Group name, or "Anyone"
    #[arg(long)]
    pub group: String,
    #[arg(long)]
    pub permission: String,
}

#[derive(Args, Debug)]
pub struct UserPermissionArgs {
    #[arg(long)]
    pub template: i64,
    #[arg(long)]
    pub login: String,
    #[arg(long)]
    pub permission: String,
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    #[arg(long)]
    pub template: i64,
    #[arg(long)]
    pub permission: String,
    /// Case-insensitive substring of the name
    #[arg(long)]
    pub search: Option<String>,
    /// in, out or any
    #[arg(long, default_value = "any")]
    pub membership: String,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl LookupArgs {
    fn to_query(&self) -> anyhow::Result<WithPermissionQuery> {
        let membership = self
            .membership
            .parse::<Membership>()
            .map_err(|_| anyhow::anyhow!("Invalid membership '{}', expected in, out or any", self.membership))?;

        let mut builder = WithPermissionQuery::builder()
            .permission(self.permission.as_str())
            .membership(membership)
            .page_index(self.page)
            .page_size(self.page_size);
        if let Some(ref search) = self.search {
            builder = builder.search(search.as_str());
        }
        Ok(builder.build()?)
    }
}

#[derive(Tabled, Serialize)]
struct GroupRow {
    #[tabled(rename = "Group")]
    name: String,
    #[tabled(rename = "Permission", display_with = "display_optional")]
    permission: Option<String>,
}

impl From<&GroupWithPermission> for GroupRow {
    fn from(group: &GroupWithPermission) -> Self {
        Self {
            name: group.name().to_string(),
            permission: group.permission.clone(),
        }
    }
}

#[derive(Tabled, Serialize)]
struct UserRow {
    #[tabled(rename = "Login")]
    login: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Permission", display_with = "display_optional")]
    permission: Option<String>,
}

impl From<&UserWithPermission> for UserRow {
    fn from(user: &UserWithPermission) -> Self {
        Self {
            login: user.login.clone(),
            name: user.name.clone(),
            permission: user.permission.clone(),
        }
    }
}

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Key")]
    kee: String,
    #[tabled(rename = "Key pattern", display_with = "display_optional")]
    key_pattern: Option<String>,
}

fn display_optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn render<T: Tabled + Serialize>(rows: Vec<T>, json: bool) -> anyhow::Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(&rows)?)
    } else {
        Ok(Table::new(rows).with(Style::rounded()).to_string())
    }
}

fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// 解析参数、初始化日志和数据库后执行子命令
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(ref path) => path.clone(),
        None => AppConfig::default_path()?,
    };
    let mut config = AppConfig::load_from(&config_path)?;
    if let Some(ref database) = cli.database {
        config.database.path = Some(database.clone());
    }

    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let _guard = logging::init_tracing(config.logging.as_ref(), &config_dir.join("logs"))?;
    tracing::info!("Starting permtemplate");

    let storage = init_storage(&config, &config_dir).await?;
    let output = execute(cli.command, storage).await?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// 执行子命令，返回需要输出到 stdout 的内容
pub async fn execute(command: Command, storage: Arc<Storage>) -> anyhow::Result<String> {
    let templates = PermissionTemplateRepository::new(storage.clone());
    let groups = GroupRepository::new(storage.clone());
    let users = UserRepository::new(storage);

    match command {
        Command::Migrate => {
            success("Database schema is up to date");
            Ok(String::new())
        }
        Command::Template(TemplateCommand::Create {
            name,
            description,
            key_pattern,
        }) => {
            let template = templates
                .create_template(NewPermissionTemplate {
                    name,
                    description,
                    key_pattern,
                })
                .await?;
            success(&format!(
                "Created permission template '{}' (id {}, key {})",
                template.name, template.id, template.kee
            ));
            Ok(String::new())
        }
        Command::Template(TemplateCommand::List) => {
            let rows: Vec<TemplateRow> = templates
                .select_all_templates()
                .await?
                .into_iter()
                .map(|t| TemplateRow {
                    id: t.id,
                    name: t.name,
                    kee: t.kee,
                    key_pattern: t.key_pattern,
                })
                .collect();
            Ok(Table::new(rows).with(Style::rounded()).to_string())
        }
        Command::Template(TemplateCommand::Delete { id }) => {
            templates.delete_template(id).await?;
            success(&format!("Deleted permission template {}", id));
            Ok(String::new())
        }
        Command::Group(GroupCommand::Create { name, description }) => {
            let group = groups.insert(&name, description).await?;
            success(&format!("Created group '{}' (id {})", group.name, group.id));
            Ok(String::new())
        }
        Command::Group(GroupCommand::List) => {
            let names: Vec<String> = groups
                .select_all()
                .await?
                .into_iter()
                .map(|g| g.name)
                .collect();
            Ok(names.join("\n"))
        }
        Command::User(UserCommand::Create { login, name }) => {
            let user = users.insert(&login, &name).await?;
            success(&format!("Created user '{}' (id {})", user.login, user.id));
            Ok(String::new())
        }
        Command::User(UserCommand::Deactivate { login }) => {
            users.deactivate(&login).await?;
            success(&format!("Deactivated user '{}'", login));
            Ok(String::new())
        }
        Command::GrantGroup(args) => {
            let group = groups.resolve(&args.group).await?;
            templates
                .add_group_permission(args.template, &group, &args.permission)
                .await?;
            success(&format!(
                "Granted '{}' to {} on template {}",
                args.permission,
                group.name(),
                args.template
            ));
            Ok(String::new())
        }
        Command::RevokeGroup(args) => {
            let group = groups.resolve(&args.group).await?;
            let removed = templates
                .remove_group_permission(args.template, &group, &args.permission)
                .await?;
            success(&format!(
                "Revoked '{}' from {} on template {} ({} removed)",
                args.permission,
                group.name(),
                args.template,
                removed
            ));
            Ok(String::new())
        }
        Command::GrantUser(args) => {
            let user = require_user(&users, &args.login).await?;
            templates
                .add_user_permission(args.template, user.id, &args.permission)
                .await?;
            success(&format!(
                "Granted '{}' to {} on template {}",
                args.permission, user.login, args.template
            ));
            Ok(String::new())
        }
        Command::RevokeUser(args) => {
            let user = require_user(&users, &args.login).await?;
            let removed = templates
                .remove_user_permission(args.template, user.id, &args.permission)
                .await?;
            success(&format!(
                "Revoked '{}' from {} on template {} ({} removed)",
                args.permission, user.login, args.template, removed
            ));
            Ok(String::new())
        }
        Command::Groups(args) => {
            let query = args.to_query()?;
            let rows: Vec<GroupRow> = templates
                .select_groups(&query, args.template)
                .await?
                .iter()
                .map(GroupRow::from)
                .collect();
            render(rows, args.json)
        }
        Command::Users(args) => {
            let query = args.to_query()?;
            let rows: Vec<UserRow> = templates
                .select_users(&query, args.template)
                .await?
                .iter()
                .map(UserRow::from)
                .collect();
            render(rows, args.json)
        }
    }
}

async fn require_user(
    users: &UserRepository,
    login: &str,
) -> anyhow::Result<crate::entities::UserModel> {
    users
        .select_by_login(login)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User '{}' not found", login))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_groups_lookup() {
        let cli = parse(&[
            "permtemplate",
            "--database",
            "/tmp/perm.db",
            "groups",
            "--template",
            "50",
            "--permission",
            "user",
            "--search",
            "sonar",
            "--membership",
            "in",
        ]);
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/perm.db")));

        match cli.command {
            Command::Groups(args) => {
                assert_eq!(args.template, 50);
                let query = args.to_query().unwrap();
                assert_eq!(query.permission(), "user");
                assert_eq!(query.search(), Some("sonar"));
                assert_eq!(query.membership(), Membership::In);
                assert_eq!(query.page_size(), DEFAULT_PAGE_SIZE);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_membership_is_rejected() {
        let cli = parse(&[
            "permtemplate",
            "users",
            "--template",
            "50",
            "--permission",
            "user",
            "--membership",
            "everyone",
        ]);
        match cli.command {
            Command::Users(args) => assert!(args.to_query().is_err()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_template_table_shows_missing_key_pattern() {
        let rows = vec![
            TemplateRow {
                id: 1,
                name: "Default template".to_string(),
                kee: "default_template_1356998400000".to_string(),
                key_pattern: None,
            },
            TemplateRow {
                id: 2,
                name: "Open source".to_string(),
                kee: "open_source_1356998400000".to_string(),
                key_pattern: Some("^oss\\..*".to_string()),
            },
        ];
        let table = Table::new(rows).to_string();
        assert!(table.contains("Key pattern"));
        assert!(table.contains("^oss\\..*"));
        assert!(table.lines().any(|line| line.contains("Default template") && line.contains(" - ")));
    }

    #[test]
    fn test_grant_group_requires_arguments() {
        assert!(Cli::try_parse_from(["permtemplate", "grant-group", "--template", "50"]).is_err());
    }

    #[tokio::test]
    async fn test_execute_grant_and_lookup() {
        let storage = Arc::new(Storage::in_memory().await.unwrap());

        let commands = [
            vec!["permtemplate", "template", "create", "Default template"],
            vec!["permtemplate", "group", "create", "sonar-users"],
            vec!["permtemplate", "group", "create", "sonar-reviewers"],
            vec![
                "permtemplate", "grant-group", "--template", "1", "--group", "anyone",
                "--permission", "user",
            ],
            vec![
                "permtemplate", "grant-group", "--template", "1", "--group", "sonar-users",
                "--permission", "user",
            ],
        ];
        for args in commands {
            execute(parse(&args).command, storage.clone()).await.unwrap();
        }

        let output = execute(
            parse(&[
                "permtemplate", "groups", "--template", "1", "--permission", "user", "--json",
            ])
            .command,
            storage.clone(),
        )
        .await
        .unwrap();

        let rows: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            rows,
            serde_json::json!([
                {"name": "Anyone", "permission": "user"},
                {"name": "sonar-reviewers", "permission": null},
                {"name": "sonar-users", "permission": "user"}
            ])
        );

        let err = execute(
            parse(&[
                "permtemplate", "grant-group", "--template", "1", "--group", "missing",
                "--permission", "user",
            ])
            .command,
            storage,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}

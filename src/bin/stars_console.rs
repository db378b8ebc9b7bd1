//! Hollywood Stars 终端前端

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hollywood_stars::app::stars::model::{ListQuery, NewStar, StarId};
use hollywood_stars::client::{render, FormField, StarsClient, StarsPage};
use tracing_subscriber::EnvFilter;

/// 浏览和维护好莱坞明星目录
#[derive(Parser)]
#[command(name = "stars_console", version, about, long_about = None)]
struct Cli {
    /// API 地址
    #[arg(long, env = "STARS_API_URL", default_value = "http://localhost:3001")]
    api: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 分页列出明星
    List {
        #[arg(long)]
        page: Option<u64>,
        #[arg(long)]
        limit: Option<u64>,
        /// 按名称搜索（不区分大小写）
        #[arg(long)]
        search: Option<String>,
    },

    /// 查看单条记录
    Show { id: StarId },

    /// 新建明星
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        major: String,
    },

    /// 打开编辑表单，修改给出的字段后保存
    Edit {
        id: StarId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        major: Option<String>,
    },

    /// 删除明星
    Delete { id: StarId },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// 返回值表示页面是否以无错误状态结束
async fn run(cli: Cli) -> Result<bool> {
    let client = StarsClient::new(cli.api);

    match cli.command {
        Commands::List {
            page,
            limit,
            search,
        } => {
            let query = ListQuery {
                page: page.map(|p| p.to_string()),
                limit: limit.map(|l| l.to_string()),
                search,
            };
            let mut stars_page = StarsPage::with_query(client, query);
            stars_page.load().await;
            print!("{}", render::page(stars_page.state()));
            Ok(!stars_page.state().has_error())
        }
        Commands::Show { id } => {
            let star = client.get(id).await?;
            println!("{}", render::star_details(&star));
            Ok(true)
        }
        Commands::Create { name, email, major } => {
            let star = client.create(&NewStar::new(name, email, major)).await?;
            println!("{}", render::star_details(&star));
            Ok(true)
        }
        Commands::Edit {
            id,
            name,
            email,
            major,
        } => {
            let mut stars_page = StarsPage::new(client);
            stars_page.load().await;
            stars_page.open_edit(id).await;
            if !stars_page.state().is_editing() {
                print!("{}", render::page(stars_page.state()));
                return Ok(false);
            }

            let changes = [
                (FormField::Name, name),
                (FormField::Email, email),
                (FormField::Major, major),
            ];
            for (field, value) in changes {
                if let Some(value) = value {
                    stars_page.change_field(field, value);
                }
            }

            stars_page.save().await;
            print!("{}", render::page(stars_page.state()));
            Ok(!stars_page.state().has_error())
        }
        Commands::Delete { id } => {
            let mut stars_page = StarsPage::new(client);
            stars_page.load().await;
            stars_page.delete(id).await;
            print!("{}", render::page(stars_page.state()));
            Ok(!stars_page.state().has_error())
        }
    }
}

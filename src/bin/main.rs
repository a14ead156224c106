mod cli {
    use anyhow::Context;
    use clap::{Parser, Subcommand};
    use dialoguer::{Confirm, Password};
    use tracing_subscriber::{fmt, EnvFilter};

    use postboard::templates::{render_html, render_text};
    use postboard::{config, ApiClient, ClientError, Controller, FileStore, PostId};

    #[derive(Parser)]
    #[command(name = "postboard", version, about = "Browse and manage posts of a blog API")]
    pub(crate) struct Cli {
        /// API base URL; remembered for later runs
        #[arg(long, global = true)]
        base_url: Option<String>,

        /// Print post lists as HTML instead of text
        #[arg(long, global = true)]
        html: bool,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        /// List posts
        Posts {
            #[arg(long)]
            category: Option<String>,
            /// Field to sort by, e.g. title or content
            #[arg(long)]
            sort: Option<String>,
            /// asc or desc
            #[arg(long)]
            direction: Option<String>,
        },
        /// Search posts by text
        Search { query: String },
        /// Like a post
        Like { id: String },
        /// Add a post (requires login)
        Add {
            #[arg(long)]
            title: String,
            #[arg(long)]
            content: String,
            #[arg(long)]
            category: String,
        },
        /// Edit one of your posts
        ///
        /// The post is looked up in the first page of the post list. For
        /// older posts pass --search with text from the post.
        Edit {
            id: String,
            #[arg(long)]
            title: Option<String>,
            #[arg(long)]
            content: Option<String>,
            #[arg(long)]
            category: Option<String>,
            /// Search text used to find the post when it is not listed
            #[arg(long)]
            search: Option<String>,
        },
        /// Delete one of your posts
        Delete {
            id: String,
            /// Skip the confirmation prompt
            #[arg(long, short)]
            yes: bool,
        },
        /// List categories
        Categories,
        Login {
            username: String,
            #[arg(long)]
            password: Option<String>,
        },
        /// Create an account and log in
        Signup {
            username: String,
            #[arg(long)]
            password: Option<String>,
        },
        Logout,
        /// Show the logged-in user
        Whoami,
        /// Show or set the API base URL
        BaseUrl { url: Option<String> },
    }

    type App = Controller<FileStore>;

    /// Message the page would show for a failed action.
    fn surfaced(app: &App, err: ClientError) -> anyhow::Error {
        let message = app
            .page()
            .alert_message
            .take()
            .unwrap_or_else(|| err.user_message());
        anyhow::anyhow!(message)
    }

    fn print_posts(app: &App, html: bool) {
        let page = app.page();
        if let Some(notice) = &page.notice {
            println!("{}", notice);
        } else if page.posts.is_empty() {
            println!("No posts.");
        } else if html {
            print!("{}", render_html(&page.posts));
        } else {
            print!("{}", render_text(&page.posts));
        }
    }

    fn password(given: Option<String>) -> anyhow::Result<String> {
        match given {
            Some(p) => Ok(p),
            None => Password::new()
                .with_prompt("Password")
                .interact()
                .context("Failed to read password"),
        }
    }

    pub async fn run() -> anyhow::Result<()> {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();

        let cli = Cli::parse();
        let store = FileStore::open(config::state_file())?;
        let app = Controller::new(ApiClient::new(), store, &config::default_base_url())?;
        if let Some(url) = &cli.base_url {
            app.page().base_url_input = url.clone();
        }

        match cli.command {
            Command::Posts {
                category,
                sort,
                direction,
            } => {
                {
                    let mut page = app.page();
                    if let Some(category) = &category {
                        page.set_filter_category(category);
                    }
                    page.sort_field = sort.unwrap_or_default();
                    page.sort_direction = direction.unwrap_or_default();
                }
                app.load_posts().await.map_err(|e| surfaced(&app, e))?;
                print_posts(&app, cli.html);
            }
            Command::Search { query } => {
                app.page().search_input = query;
                match app.search_posts().await {
                    Ok(()) | Err(ClientError::Api { .. }) => print_posts(&app, cli.html),
                    Err(e) => return Err(surfaced(&app, e)),
                }
            }
            Command::Like { id } => {
                let id = PostId::new(id);
                match app.like_post(&id).await.map_err(|e| surfaced(&app, e))? {
                    Some(likes) => println!("❤️ {} likes on post {}", likes, id),
                    None => println!("Liked post {}", id),
                }
            }
            Command::Add {
                title,
                content,
                category,
            } => {
                app.load_categories().await.ok();
                app.open_add_modal().map_err(|e| surfaced(&app, e))?;
                {
                    let mut page = app.page();
                    page.add_form.title = title;
                    page.add_form.content = content;
                    page.set_add_category(&category);
                }
                app.submit_add().await.map_err(|e| surfaced(&app, e))?;
                println!("Post added.");
                print_posts(&app, cli.html);
            }
            Command::Edit {
                id,
                title,
                content,
                category,
                search,
            } => {
                let id = PostId::new(id);
                app.load_categories().await.ok();
                app.load_posts().await.map_err(|e| surfaced(&app, e))?;
                let listed = app.page().block(id.as_str()).is_some();
                if let (false, Some(query)) = (listed, search) {
                    app.page().search_input = query;
                    app.search_posts().await.map_err(|e| surfaced(&app, e))?;
                }
                app.open_edit_modal(&id).map_err(|e| surfaced(&app, e))?;
                {
                    let mut page = app.page();
                    if let Some(title) = title {
                        page.edit_form.title = title;
                    }
                    if let Some(content) = content {
                        page.edit_form.content = content;
                    }
                    if let Some(category) = &category {
                        page.set_edit_category(category);
                    }
                }
                app.submit_update().await.map_err(|e| surfaced(&app, e))?;
                println!("Post {} updated.", id);
            }
            Command::Delete { id, yes } => {
                let id = PostId::new(id);
                let confirm = |question: &str| {
                    yes || Confirm::new()
                        .with_prompt(question)
                        .default(false)
                        .interact()
                        .unwrap_or(false)
                };
                if app
                    .delete_post(&id, confirm)
                    .await
                    .map_err(|e| surfaced(&app, e))?
                {
                    println!("Post {} deleted.", id);
                } else {
                    println!("Cancelled.");
                }
            }
            Command::Categories => {
                app.load_categories().await.map_err(|e| surfaced(&app, e))?;
                for category in app.categories() {
                    println!("{}", category);
                }
            }
            Command::Login { username, password: given } => {
                let password = password(given)?;
                app.login(&username, &password)
                    .await
                    .map_err(|e| surfaced(&app, e))?;
                println!("{}", app.page().welcome_text);
            }
            Command::Signup { username, password: given } => {
                let password = password(given)?;
                app.signup(&username, &password)
                    .await
                    .map_err(|e| surfaced(&app, e))?;
                println!("{}", app.page().welcome_text);
            }
            Command::Logout => {
                app.logout().await;
                println!("Logged out.");
            }
            Command::Whoami => match app.session().username() {
                Some(name) => println!("{}", name),
                None => println!("Not logged in."),
            },
            Command::BaseUrl { url } => {
                if let Some(url) = url {
                    app.set_base_url(&url);
                }
                println!("{}", app.page().base_url_input);
            }
        }
        Ok(())
    }
}


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::run().await
}

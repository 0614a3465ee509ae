use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use storefront::state::product_form::ProductForm;
use uuid::Uuid;

use crate::config::STATE_FILE_ENV;

#[derive(Parser, Debug)]
#[command(name = "isdstore", about = "ISDStore hardware shop from the terminal")]
pub struct Cli {
    /// Backend origin. Defaults to `ISDSTORE_API_BASE_URL`, then `http://localhost:8080`.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Session file holding the stored tokens and profile.
    #[arg(long, global = true, env = STATE_FILE_ENV)]
    pub state_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session.
    Login(Credentials),
    /// Create an account. Does not sign in.
    Register(Credentials),
    /// Forget the stored session.
    Logout,
    /// Show who the stored session belongs to.
    Whoami,
    /// List the catalogue.
    Products,
    /// Show one product.
    Product { id: Uuid },
    /// Show the cart.
    Cart,
    /// Add a product to the cart.
    Add {
        id: Uuid,
        #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
    /// Remove a product from the cart.
    Remove { id: Uuid },
    /// Place an order for everything in the cart.
    Checkout,
    /// List your orders.
    Orders,
    Admin(AdminCommand),
}

#[derive(Args, Debug)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "ISDSTORE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct AdminCommand {
    #[command(subcommand)]
    pub command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminSubcommand {
    /// List every customer's orders.
    Orders,
    CreateProduct(ProductArgs),
    UpdateProduct {
        id: Uuid,
        #[command(flatten)]
        product: ProductArgs,
    },
    DeleteProduct { id: Uuid },
}

/// Product form fields, taken as typed and validated before sending.
#[derive(Args, Debug, Clone)]
pub struct ProductArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long = "price-cents", default_value = "")]
    pub price_cents: String,
    #[arg(long, default_value = "")]
    pub image: String,
    #[arg(long, default_value = "")]
    pub stock: String,
}

impl From<ProductArgs> for ProductForm {
    fn from(args: ProductArgs) -> Self {
        Self {
            title: args.title,
            description: args.description,
            price_cents: args.price_cents,
            image: args.image,
            stock: args.stock,
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod cli_test;

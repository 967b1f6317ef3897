use clap::{Parser, Subcommand};
use lightbnb_store::StoreConfig;
use lightbnb_store::search::{DEFAULT_LIMIT, PropertySearch};

#[derive(Parser, Debug)]
#[command(author, version, about = "Query the LightBnB store from a shell")]
pub(crate) struct Args {
    #[command(flatten)]
    pub(crate) store: StoreConfig,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Create the tables if they do not exist
    InitSchema,
    UserByEmail {
        email: String,
    },
    UserById {
        id: i64,
    },
    /// Past reservations of a guest, oldest first
    Reservations {
        guest_id: i64,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: i64,
    },
    /// Search listings, cheapest first
    Search(SearchArgs),
}

#[derive(clap::Args, Debug)]
pub(crate) struct SearchArgs {
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    owner_id: Option<i64>,
    #[arg(long)]
    minimum_price_per_night: Option<i64>,
    #[arg(long)]
    maximum: Option<i64>,
    #[arg(long)]
    minimum_rating: Option<f64>,
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub(crate) limit: i64,
}

impl SearchArgs {
    pub(crate) fn options(&self) -> PropertySearch {
        PropertySearch {
            city: self.city.clone(),
            owner_id: self.owner_id,
            minimum_price_per_night: self.minimum_price_per_night,
            maximum: self.maximum,
            minimum_rating: self.minimum_rating,
        }
    }
}

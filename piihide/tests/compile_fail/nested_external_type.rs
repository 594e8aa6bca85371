use piihide::Pii;

#[derive(Debug)]
struct ExternalTimestamp(u64);

#[derive(Pii)]
struct Event {
    #[pii]
    actor: String,
    #[pii(nested)]
    at: ExternalTimestamp,
}

fn main() {}

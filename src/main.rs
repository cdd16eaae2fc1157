use arbor::common::DEFAULT_BUFFER_POOL_SIZE;
use arbor::BPlusTree;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Arbor - a disk-backed B+ tree index");
    println!("===================================\n");

    // Start from a clean file so the demo can be re-run
    let db_path = "demo.db";
    let _ = std::fs::remove_file(db_path);

    let mut tree = BPlusTree::<u64, u64>::open(db_path, DEFAULT_BUFFER_POOL_SIZE)
        .expect("Failed to open tree");
    println!("Opened tree at: {} (len = {})", db_path, tree.len());

    // Insert a batch of keys out of order
    for key in [50u64, 20, 80, 10, 60, 30, 90, 40, 70] {
        tree.insert(&key, &(key * 100)).expect("Failed to insert");
    }
    println!("Inserted 9 keys, len = {}", tree.len());

    // Point lookups
    println!("get(30) = {:?}", tree.get(&30).expect("lookup failed"));
    println!("get(55) = {:?}", tree.get(&55).expect("lookup failed"));

    // Range scan
    let values = tree.get_range(&20, &60).expect("range scan failed");
    println!("values in [20, 60]: {:?}", values);

    // Ordered iteration
    print!("all entries:");
    for entry in tree.iter().expect("iterator failed") {
        let (key, value) = entry.expect("iteration failed");
        print!(" {key}->{value}");
    }
    println!();

    // Remove a few keys
    for key in [20u64, 50, 80] {
        tree.remove(&key).expect("Failed to remove");
    }
    println!("After removes, len = {}", tree.len());

    tree.close().expect("Failed to close tree");
    println!("Tree flushed and closed.");
}

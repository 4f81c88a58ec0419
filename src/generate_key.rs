// generate_key.rs
// Prints a fresh ENCRYPTION_MASTER_KEY for sealing secrets in system_settings

#[path = "services/encryption.rs"]
mod encryption;

use encryption::EncryptionService;

fn main() {
    let key = EncryptionService::generate_key();

    println!("✅ New AES-256 key generated\n");
    println!("Add this to your .env file:");
    println!("─────────────────────────────────────────────────");
    println!("ENCRYPTION_MASTER_KEY={}", key);
    println!("─────────────────────────────────────────────────");
    println!("\n⚠️  Settings sealed with this key cannot be read without it.");
}

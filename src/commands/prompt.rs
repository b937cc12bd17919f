use anyhow::Result;

use crate::journal::advice::system_prompt;
use crate::journal::profile::UserProfile;

pub fn run(profile: &UserProfile, json: bool) -> Result<()> {
    let prompt = system_prompt(profile);
    if json {
        let out = serde_json::json!({ "system_prompt": prompt });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{prompt}");
    }
    Ok(())
}

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("auction-agent").unwrap();
    cmd.env_remove("AUCTION_AGENT_RPC_URL")
        .env_remove("AUCTION_AGENT_FROM")
        .arg("--config")
        .arg(config_dir.path().join("config.yaml"));
    cmd
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Auction Agent CLI v"))
        .stdout(predicate::str::contains("Toolkit library:"));
}

#[test]
fn test_tools_list() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["tools", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("start_nft_auction"))
        .stdout(predicate::str::contains("bid_on_nft"))
        .stdout(predicate::str::contains("finalize_nft_auction"))
        .stdout(predicate::str::contains("deploy_nft"))
        .stdout(predicate::str::contains("mint_nft"));
}

#[test]
fn test_tools_list_json() {
    let dir = TempDir::new().unwrap();
    let output = cli(&dir)
        .args(["tools", "list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let specs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let specs = specs.as_array().unwrap();
    assert_eq!(specs.len(), 5);
    assert_eq!(specs[0]["type"], "function");
    assert_eq!(specs[0]["function"]["name"], "start_nft_auction");
}

#[test]
fn test_zero_duration_fails_before_submission() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--rpc-url", "http://127.0.0.1:9"])
        .args([
            "auction",
            "start",
            "--nft-contract",
            "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
            "--token-id",
            "1",
            "--starting-price",
            "0.1",
            "--duration",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error creating auction: Validation error",
        ));
}

#[test]
fn test_tools_call_with_bad_address() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--rpc-url", "http://127.0.0.1:9"])
        .args([
            "tools",
            "call",
            "mint_nft",
            r#"{"contract_address": "nope", "destination": "nope"}"#,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error minting NFT: Invalid address"));
}

#[test]
fn test_tools_call_unknown_tool() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["tools", "call", "transfer_nft", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tool: transfer_nft"));
}

#[test]
fn test_deploy_without_bytecode_fails_before_submission() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--rpc-url", "http://127.0.0.1:9"])
        .args(["nft", "deploy", "--name", "MyNFT", "--symbol", "MNFT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error deploying NFT: Operation not supported",
        ))
        .stderr(predicate::str::contains("nft.collection_bytecode"));
}

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration written to"));
    assert!(dir.path().join("config.yaml").exists());

    cli(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    cli(&dir)
        .args(["--rpc-url", "http://127.0.0.1:8545", "config", "show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rpc_url\": \"http://127.0.0.1:8545\""))
        .stdout(predicate::str::contains(
            "0xA0f0b923532fdbcd85A11ccAED1362691C7931fA",
        ));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "auction:\n  contract_address: \"0xnope\"\n",
    )
    .unwrap();

    cli(&dir)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("auction.contract_address"));
}

#[test]
fn test_config_init_force_replaces_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "auction:\n  contract_address: \"0xnope\"\n").unwrap();

    cli(&dir)
        .args(["config", "init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration written to"));

    cli(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "0xA0f0b923532fdbcd85A11ccAED1362691C7931fA",
        ));
}

#[test]
fn test_config_init_without_force_keeps_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "network: [not, a, map]\n").unwrap();

    cli(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "network: [not, a, map]\n"
    );
}

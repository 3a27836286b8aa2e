use anyhow::{Context, Result, ensure};

use hub_utils::{
    HubConfig,
    challenge::{CHALLENGE_ALPHABET, CHALLENGE_LENGTH},
    config::init_logger,
    get_hash_key_name, get_random_challenge, sha1_hash, sha1_hmac, unicode_to_iri, utf8encoded,
    report::{PROBE_URLS, SAMPLE_IRI, SAMPLE_SECRET, SAMPLE_VALUE, SelfcheckReport},
};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = HubConfig::from_env().context("load hub config")?;
    init_logger(&config);
    tracing::info!(
        server_software = %config.server_software,
        dev_env = config.is_dev_env(),
        "hub selfcheck start"
    );

    tracing::info!("encoding");
    let bytes = utf8encoded(Some(SAMPLE_IRI)).context("encode sample")?;
    ensure!(
        String::from_utf8(bytes).context("decode sample")? == SAMPLE_IRI,
        "utf8 round trip mismatch"
    );
    ensure!(utf8encoded(None).is_none(), "utf8encoded(None) returned bytes");
    let iri = unicode_to_iri(SAMPLE_IRI).context("convert sample iri")?;
    ensure!(iri.is_ascii(), "iri still contains non-ascii bytes");
    ensure!(iri.starts_with("http:"), "iri scheme changed");
    ensure!(unicode_to_iri("no-scheme").is_err(), "iri without scheme accepted");
    tracing::info!("encoding ok");

    tracing::info!("hashing");
    ensure!(
        sha1_hash("abc") == "a9993e364706816aba3e25717850c26c9cd0d89d",
        "sha1 vector mismatch"
    );
    ensure!(
        get_hash_key_name(SAMPLE_VALUE) == format!("hash_{}", sha1_hash(SAMPLE_VALUE)),
        "hash key name mismatch"
    );
    ensure!(
        sha1_hmac("Jefe", "what do ya want for nothing?")
            == "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79",
        "hmac vector mismatch"
    );
    ensure!(
        sha1_hmac(SAMPLE_SECRET, SAMPLE_VALUE) != sha1_hmac("other", SAMPLE_VALUE),
        "hmac ignores secret"
    );
    tracing::info!("hashing ok");

    tracing::info!("challenge");
    let first = get_random_challenge().context("generate challenge")?;
    let second = get_random_challenge().context("generate second challenge")?;
    ensure!(first.len() == CHALLENGE_LENGTH, "challenge len mismatch");
    ensure!(
        first.bytes().all(|byte| CHALLENGE_ALPHABET.contains(&byte)),
        "challenge charset mismatch"
    );
    ensure!(first != second, "challenges repeated");
    tracing::info!("challenge ok");

    tracing::info!("url validation");
    let report = SelfcheckReport::collect(&config).context("collect report")?;
    let odd_port_allowed = config.is_dev_env() || config.valid_ports.contains(&9999);
    for (probe, (url, expected)) in report.probes.iter().zip(PROBE_URLS) {
        let expected = expected || (odd_port_allowed && url.contains(":9999"));
        ensure!(probe.valid == expected, "probe {url} mismatch");
    }
    tracing::info!("url validation ok");

    let json = serde_json::to_string_pretty(&report).context("serialize report")?;
    println!("{json}");

    tracing::info!("hub selfcheck done");
    Ok(())
}

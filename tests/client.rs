use std::net::TcpListener;

use assert_matches::assert_matches;

use biomaj_catalog::client::{BiomajHttpClient, CatalogQuery, CatalogSource};
use biomaj_catalog::error::BiomajError;

#[test]
fn closed_port_is_unreachable() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = BiomajHttpClient::new(&format!("http://127.0.0.1:{port}/biomaj")).unwrap();
    assert_eq!(client.base_url(), format!("http://127.0.0.1:{port}/biomaj/"));

    let err = client
        .fetch(&CatalogQuery::new().formats(["fasta"]))
        .unwrap_err();
    assert_matches!(err, BiomajError::UnreachableServer { ref url, .. } if url.ends_with("GET?banks=all&formats=fasta"));
}

/*!

This is the long-form manual for `alignment_engine` and `votealign`.

## Input formats

Both inputs are JSON files produced by the data collection scripts.

### Legislators

Either an object keyed by the name of the legislator, or an array of records
that each carry a `name`. Both forms may be wrapped in a `legislators` field.

```text
{
  "legislators": {
    "Jane Doe": {
      "party": "R", "chamber": "House", "district": 12,
      "email": "jdoe@le.utah.gov", "image": "",
      "yea_votes": ["HB0001", "SB0042"],
      "nay_votes": ["HB0107"]
    }
  }
}
```

The name is the key of the legislator in the output and must be unique. A bill
may not appear in both `yea_votes` and `nay_votes` of the same legislator.
Missing vote lists are empty.

### Bills

An array of bill records, optionally wrapped in a `bills` field.

```text
[
  {
    "bill_number": "HB0001",
    "house_votes_against": 3,
    "senate_votes_against": 3,
    "author_position": "Support",
    "heal_utah_position": "Support",
    "libertas_institute_position": "Unknown"
  }
]
```

- `bill_number` is mandatory and unique.
- `house_votes_against` and `senate_votes_against` are optional and default to 0.
- Every field named `<org_id>_position` records the stance of the organization
  `org_id`, except `author_position`. Only `Support` and `Oppose` (exact case)
  are stances. Any other value means that the organization has no stance on this
  bill. An organization without any stance is not reported.

## Contested bills

A bill is contested when `house_votes_against + senate_votes_against` is at
least the contested threshold (6 by default, see `--threshold`). Most bills
pass unanimously or close to it: restricting the comparison to contested bills
shows how legislators align when it actually matters.

## Alignment

For a legislator and an organization, every bill tracked by the organization
and voted on by the legislator counts as:
- an agreement if the legislator voted yea and the organization supports it, or
  voted nay and the organization opposes it,
- a disagreement otherwise.

The alignment is `100 * agreements / (agreements + disagreements)`, rounded to
one decimal, ties to even (6.25 gives 6.2). When there is no bill to compare, there is no alignment at all
and the organization is left out of the `alignments` of this legislator. It is
never reported as 0%.

## Configuration

The command line accepts a JSON configuration file with `--config`:

```text
{
  "legislatorsPath": "data/legislators.json",
  "billsPath": "data/bills.json",
  "outputPath": "data/compare_data.json",
  "contestedThreshold": 6
}
```

Relative paths are resolved against the directory of the configuration file.
Command line flags take precedence over the configuration file.

## Output

See `votealign --help`. The output is a single JSON document with the
`organizations`, the `legislators` with their `alignments` and
`alignmentsContested`, and the totals `totalBills`, `contestedBills` and
`totalVotesAnalyzed`. Running twice on the same input yields the same document
except for `lastUpdated`.

 */
